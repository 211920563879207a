//! Drag-rectangle selection.

use crate::entities::Selectable;
use crate::geometry::{Bounds, Position};

/// Every item whose bounds overlap the rectangle spanned by the two drag corners.
///
/// Overlap is strict: an item that only touches the rectangle's edge is not selected.
/// Items do not have to be fully contained.
pub fn items_in_rectangle<I>(items: I, top_left: Position, bottom_right: Position) -> Vec<Selectable>
where
    I: IntoIterator<Item = (Selectable, Bounds)>,
{
    let rectangle = Bounds::from_corners(top_left, bottom_right);
    items
        .into_iter()
        .filter(|(_, bounds)| bounds.overlaps(&rectangle))
        .map(|(item, _)| item)
        .collect()
}
