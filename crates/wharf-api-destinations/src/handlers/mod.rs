//! HTTP handlers for the destination API.

pub mod destinations;

pub use destinations::{
    clone_destination, create_destination, delete_destination, get_destination,
    list_destinations, search_destinations, update_destination, upgrade_destination_version,
};
