use std::any::Any;

/// External per-phase context passed into every component update of one
/// system pass — a rendering context, a physics step context, and so on.
///
/// Stateless across ticks unless the owning system explicitly carries
/// state forward. Cloning a system deep-copies its parameterization
/// through [`duplicate`](Parameterization::duplicate); cloned systems
/// must never alias parameterization state.
pub trait Parameterization: Send + Sync {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Value copy into a fresh, independent instance.
    fn duplicate(&self) -> Box<dyn Parameterization>;
}

impl<'p> dyn Parameterization + 'p {
    /// Typed view of this parameterization, or None if it is of another
    /// concrete type.
    pub fn downcast_ref<P: 'static>(&self) -> Option<&P> {
        self.as_any().downcast_ref::<P>()
    }

    /// Typed mutable view of this parameterization, or None if it is of
    /// another concrete type.
    pub fn downcast_mut<P: 'static>(&mut self) -> Option<&mut P> {
        self.as_any_mut().downcast_mut::<P>()
    }
}
