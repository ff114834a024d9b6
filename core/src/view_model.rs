//! Viewmodels: per-node data and behavior shared by a component's views.

use core::any::Any;

/// Data/behavior object associated with a component.
///
/// One instance is created per rendering node and bound to every view of
/// that node.
pub trait ViewModel: Any + 'static {}

impl dyn ViewModel {
    /// Returns `true` when the viewmodel is of type `T`.
    #[must_use]
    pub fn is<T: ViewModel>(&self) -> bool {
        (self as &dyn Any).is::<T>()
    }

    /// Downcasts to a concrete viewmodel type.
    #[must_use]
    pub fn downcast_ref<T: ViewModel>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref::<T>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Counter(u32);
    impl ViewModel for Counter {}

    struct Other;
    impl ViewModel for Other {}

    #[test]
    fn downcasts_to_concrete_type() {
        let vm: Box<dyn ViewModel> = Box::new(Counter(3));
        assert!(vm.is::<Counter>());
        assert!(!vm.is::<Other>());
        assert_eq!(vm.downcast_ref::<Counter>(), Some(&Counter(3)));
    }
}
