//! Swipe-to-dismiss cards for swipekit.
//!
//! [`SwipeCard`] is the per-card state machine, [`StackLayout`] maps the top
//! card's progress onto the cards behind it, and [`SwipeDeck`] keeps a keyed
//! list of items with a window of mounted cards.

mod card;
mod deck;
mod settings;
mod stack_layout;

pub use card::{CardState, SwipeCard, SwipeDirection};
pub use deck::{CardFrame, SwipeDeck};
pub use settings::{
    StackStyle, SwipeSettings, DEFAULT_EXIT_DURATION_MILLIS, DEFAULT_THRESHOLD,
    DEFAULT_VISIBLE_COUNT,
};
pub use stack_layout::{CardTransform, StackLayout};

pub mod prelude {
    pub use crate::card::{CardState, SwipeCard, SwipeDirection};
    pub use crate::deck::SwipeDeck;
    pub use crate::settings::SwipeSettings;
}
