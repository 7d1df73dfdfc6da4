//! Core traits that decouple the layout engine from any specific scene
//! graph.
//!
//! A host toolkit wraps its actors in [`LayoutChild`] and its container in
//! [`LayoutContainer`]; the [`DynamicTableLayout`](crate::table::DynamicTableLayout)
//! only depends on these abstractions.  [`Container`] and [`FixedActor`] are
//! plain in-memory implementations used by the CLI and the tests.

use crate::geometry::{ActorBox, RequestMode, Size};

/// A child actor the engine can measure and place.
///
/// The engine never owns children; it only queries them and hands out
/// allocations.
pub trait LayoutChild {
    /// Whether the child takes part in layout at all.  Hidden children are
    /// neither counted, measured nor allocated.
    fn is_visible(&self) -> bool;

    /// The child's natural size, absent any external constraint.
    fn preferred_size(&self) -> Size;

    /// Assign the child its final rectangle.
    ///
    /// The child may lay out its own content inside the box; the engine does
    /// not recurse.
    fn allocate(&mut self, allocation: ActorBox);
}

/// The actor whose children are being laid out.
pub trait LayoutContainer {
    /// The type of child this container holds.
    type Child: LayoutChild;

    /// Children in iteration (paint) order.
    fn children(&self) -> &[Self::Child];

    /// Mutable access to the children, in the same order as
    /// [`children`](LayoutContainer::children).
    fn children_mut(&mut self) -> &mut [Self::Child];

    /// The container's request mode, consulted when both dimensions are
    /// constrained.
    fn request_mode(&self) -> RequestMode;
}

//  In-memory implementations

/// A child with a fixed natural size.
///
/// Records the last allocation it received so callers can read back where
/// the engine put it.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedActor {
    pub size: Size,
    pub visible: bool,
    pub allocation: Option<ActorBox>,
}

impl FixedActor {
    /// A visible actor with natural size `width × height`.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Size::new(width, height),
            visible: true,
            allocation: None,
        }
    }

    /// Same as [`new`](FixedActor::new) but hidden.
    pub fn hidden(width: f32, height: f32) -> Self {
        Self {
            visible: false,
            ..Self::new(width, height)
        }
    }
}

impl LayoutChild for FixedActor {
    fn is_visible(&self) -> bool {
        self.visible
    }

    fn preferred_size(&self) -> Size {
        self.size
    }

    fn allocate(&mut self, allocation: ActorBox) {
        self.allocation = Some(allocation);
    }
}

/// A `Vec`-backed container.
#[derive(Debug, Clone)]
pub struct Container<C> {
    children: Vec<C>,
    request_mode: RequestMode,
}

impl<C: LayoutChild> Container<C> {
    pub fn new(children: Vec<C>, request_mode: RequestMode) -> Self {
        Self {
            children,
            request_mode,
        }
    }

    pub fn into_children(self) -> Vec<C> {
        self.children
    }
}

impl<C: LayoutChild> LayoutContainer for Container<C> {
    type Child = C;

    fn children(&self) -> &[C] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut [C] {
        &mut self.children
    }

    fn request_mode(&self) -> RequestMode {
        self.request_mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_actor_records_allocation() {
        let mut a = FixedActor::new(100.0, 50.0);
        assert!(a.is_visible());
        assert_eq!(a.preferred_size(), Size::new(100.0, 50.0));
        assert!(a.allocation.is_none());
        a.allocate(ActorBox::from_size(10.0, 10.0));
        assert_eq!(a.allocation, Some(ActorBox::from_size(10.0, 10.0)));
    }

    #[test]
    fn hidden_actor_is_not_visible() {
        assert!(!FixedActor::hidden(1.0, 1.0).is_visible());
    }

    #[test]
    fn container_reports_the_mode_it_was_built_with() {
        let c = Container::new(vec![FixedActor::new(1.0, 1.0)], RequestMode::WidthForHeight);
        assert_eq!(c.request_mode(), RequestMode::WidthForHeight);
        assert_eq!(c.children().len(), 1);
        let c = Container::new(Vec::<FixedActor>::new(), RequestMode::HeightForWidth);
        assert_eq!(c.request_mode(), RequestMode::HeightForWidth);
    }
}
