pub mod elo;
pub mod event;
pub mod export;
pub mod features;
pub mod game_state;
pub mod inference;
pub mod manifest;
pub mod replay;
