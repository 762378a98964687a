//! # LEGO Inventory
//!
//! Read-only lookups over the parts inventory.
//!
//! ## Layout
//! - Boxes hold containers, each container sits at one position (`A1`, `B3`, ...)
//! - A (box, position) pair holds at most one container
//! - Containers hold pieces through `ContainerPiece`
//!
//! ## Ids
//! - Containers: `c` + 3-digit zero padded number, `c007`. Bare numbers are padded on the way in.
//! - Boxes: uppercase, `B1`. Input is uppercased before lookup.
//! - Locations render as box + lowercased position, `B1a1`.
//!
//! ## Cardinality
//! The association table allows several pieces per container. Every shape here is a list so
//! nothing gets dropped if that ever happens.
pub mod boxes;
pub mod containers;
pub mod ids;
pub mod pieces;
pub mod search;

pub use boxes::{BoxSlot, contents_of_box, list_boxes, list_positions};
pub use containers::{ContainerDetail, Location, locate_by_position, locate_container, location_of};
pub use ids::{
    container_id_from_number, denormalize_container_id, normalize_box_id, normalize_container_id,
    render_location,
};
pub use pieces::{Piece, containers_holding, get_piece, list_categories, pieces_in_container};
pub use search::{ContainerHit, PieceHit, PieceQuery, search_pieces};
