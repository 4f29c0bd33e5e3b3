use crate::catalog::ProductId;
use crate::selection::DragPayload;

pub mod card;
pub mod catalog_view;
pub mod chat_view;
pub mod modal;
pub mod selection_view;

/// What the user asked for while a view was drawn. Applied after rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardAction {
    Describe(ProductId),
    Add(ProductId),
    Remove(ProductId),
    Dropped(DragPayload),
}
