//! Data models for pokedex-sync

pub mod pokemon;

pub use pokemon::{ListingEntry, ListingPage, Pokemon, PokemonDetail};
