//! Keyed stack of swipeable cards.
//!
//! The deck owns its items in stack order, front of the list on top. Only
//! the first `visible_count` items have a mounted [`SwipeCard`]; a card's
//! depth is its index in that window. When the top card commits, the deck
//! filters its entry out by key on the main context and hands the item to
//! the matching swipe callback, which shifts every remaining card up one
//! level.

use std::cell::RefCell;
use std::fmt::Debug;
use std::hash::Hash;
use std::rc::{Rc, Weak};

use rustc_hash::FxHashSet;
use swipekit_core::RuntimeHandle;
use swipekit_foundation::{GestureOutcome, GestureSampler, PanEvent, PanPhase, PanRelease};
use swipekit_ui_graphics::{Point, Rect};

use crate::card::{SwipeCard, SwipeDirection};
use crate::settings::SwipeSettings;
use crate::stack_layout::CardTransform;

type KeyFn<T, K> = Box<dyn Fn(&T) -> K>;
type MeasureFn<K> = Rc<dyn Fn(&K) -> Option<Rect>>;
type SwipeCallback<T> = Box<dyn FnMut(T)>;

/// Render snapshot of one mounted card.
#[derive(Clone, Debug, PartialEq)]
pub struct CardFrame<K> {
    pub key: K,
    /// Depth, 0 = top.
    pub position: usize,
    pub progress: f32,
    pub transform: CardTransform,
}

struct DeckEntry<T, K> {
    key: K,
    item: T,
    card: Option<SwipeCard>,
}

/// Handle to a deck. Clones share the same deck.
pub struct SwipeDeck<T: 'static, K: 'static> {
    inner: Rc<DeckInner<T, K>>,
}

impl<T: 'static, K: 'static> Clone for SwipeDeck<T, K> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

struct DeckInner<T: 'static, K: 'static> {
    runtime: RuntimeHandle,
    settings: SwipeSettings,
    key_of: KeyFn<T, K>,
    measure: MeasureFn<K>,
    entries: RefCell<Vec<DeckEntry<T, K>>>,
    sampler: RefCell<GestureSampler>,
    on_swipe_left: RefCell<Option<SwipeCallback<T>>>,
    on_swipe_right: RefCell<Option<SwipeCallback<T>>>,
}

impl<T, K> SwipeDeck<T, K>
where
    T: 'static,
    K: Clone + Eq + Hash + Debug + 'static,
{
    /// Builds a deck over `items`. `measure` reports a card's bounds by key.
    pub fn new(
        runtime: &RuntimeHandle,
        items: Vec<T>,
        key_of: impl Fn(&T) -> K + 'static,
        measure: impl Fn(&K) -> Option<Rect> + 'static,
        settings: SwipeSettings,
    ) -> Self {
        let deck = Self {
            inner: Rc::new(DeckInner {
                runtime: runtime.clone(),
                settings: settings.sanitized(),
                key_of: Box::new(key_of),
                measure: Rc::new(measure),
                entries: RefCell::new(Vec::new()),
                sampler: RefCell::new(GestureSampler::new()),
                on_swipe_left: RefCell::new(None),
                on_swipe_right: RefCell::new(None),
            }),
        };
        deck.set_items(items);
        deck
    }

    pub fn on_swipe_left(self, callback: impl FnMut(T) + 'static) -> Self {
        *self.inner.on_swipe_left.borrow_mut() = Some(Box::new(callback));
        self
    }

    pub fn on_swipe_right(self, callback: impl FnMut(T) + 'static) -> Self {
        *self.inner.on_swipe_right.borrow_mut() = Some(Box::new(callback));
        self
    }

    pub fn settings(&self) -> SwipeSettings {
        self.inner.settings
    }

    pub fn len(&self) -> usize {
        self.inner.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keys in stack order, top first.
    pub fn keys(&self) -> Vec<K> {
        self.inner
            .entries
            .borrow()
            .iter()
            .map(|entry| entry.key.clone())
            .collect()
    }

    pub fn position_of(&self, key: &K) -> Option<usize> {
        self.inner
            .entries
            .borrow()
            .iter()
            .position(|entry| &entry.key == key)
    }

    /// Replaces the backing list. Cards of keys that survive keep their
    /// state; entries with a duplicate key are dropped.
    pub fn set_items(&self, items: Vec<T>) {
        let mut previous: Vec<DeckEntry<T, K>> =
            self.inner.entries.borrow_mut().drain(..).collect();
        let mut seen = FxHashSet::default();
        let mut entries = Vec::with_capacity(items.len());
        for item in items {
            let key = (self.inner.key_of)(&item);
            if !seen.insert(key.clone()) {
                log::warn!("duplicate deck key {key:?}, dropping item");
                continue;
            }
            let card = previous
                .iter_mut()
                .find(|entry| entry.key == key)
                .and_then(|entry| entry.card.take());
            entries.push(DeckEntry { key, item, card });
        }
        *self.inner.entries.borrow_mut() = entries;
        drop(previous);
        DeckInner::sync_window(&self.inner);
    }

    /// Appends an item at the bottom of the stack.
    pub fn push(&self, item: T) {
        let key = (self.inner.key_of)(&item);
        if self.position_of(&key).is_some() {
            log::warn!("duplicate deck key {key:?}, dropping item");
            return;
        }
        self.inner.entries.borrow_mut().push(DeckEntry {
            key,
            item,
            card: None,
        });
        DeckInner::sync_window(&self.inner);
    }

    pub fn top_card(&self) -> Option<SwipeCard> {
        self.inner
            .entries
            .borrow()
            .first()
            .and_then(|entry| entry.card.clone())
    }

    pub fn card(&self, key: &K) -> Option<SwipeCard> {
        self.inner
            .entries
            .borrow()
            .iter()
            .find(|entry| &entry.key == key)
            .and_then(|entry| entry.card.clone())
    }

    /// Progress shared by the whole stack: the top card's progress.
    pub fn progress(&self) -> f32 {
        self.top_card().map_or(0.0, |card| card.progress())
    }

    /// Routes one pan event to the top card.
    pub fn handle_pan(&self, event: PanEvent) {
        let Some(card) = self.top_card() else {
            self.inner.sampler.borrow_mut().cancel();
            return;
        };
        let outcome = self.inner.sampler.borrow_mut().handle(event);
        match event.phase {
            PanPhase::Begin => card.on_drag_start(),
            PanPhase::Update => card.on_drag_update(event.translation.x, event.translation.y),
            PanPhase::Cancel => card.on_drag_cancel(),
            PanPhase::End => match outcome {
                Some(GestureOutcome::Pan(release)) => card.on_drag_end(release),
                Some(GestureOutcome::Tap(position)) => {
                    card.on_drag_end(PanRelease::new(event.translation, position, Point::ZERO))
                }
                None => {}
            },
        }
    }

    /// Mounted cards back to front, ready to paint in order.
    pub fn cards(&self) -> Vec<CardFrame<K>> {
        let progress = self.progress();
        let entries = self.inner.entries.borrow();
        let mut frames: Vec<CardFrame<K>> = entries
            .iter()
            .enumerate()
            .filter_map(|(position, entry)| {
                let card = entry.card.as_ref()?;
                Some(CardFrame {
                    key: entry.key.clone(),
                    position,
                    progress: card.progress(),
                    transform: card.transform(position, progress),
                })
            })
            .collect();
        frames.reverse();
        frames
    }
}

impl<T, K> SwipeDeck<T, K>
where
    T: Clone + 'static,
    K: Clone + Eq + Hash + Debug + 'static,
{
    /// Items in stack order, top first.
    pub fn items(&self) -> Vec<T> {
        self.inner
            .entries
            .borrow()
            .iter()
            .map(|entry| entry.item.clone())
            .collect()
    }
}

impl<T, K> DeckInner<T, K>
where
    T: 'static,
    K: Clone + Eq + Hash + Debug + 'static,
{
    /// Mounts cards inside the visible window and unmounts the rest.
    fn sync_window(this: &Rc<Self>) {
        let visible = this.settings.visible_count;
        let mut entries = this.entries.borrow_mut();
        for (position, entry) in entries.iter_mut().enumerate() {
            if position >= visible {
                entry.card = None;
                continue;
            }
            if entry.card.is_none() {
                entry.card = Some(Self::mount(this, &entry.key));
            }
        }
    }

    fn mount(this: &Rc<Self>, key: &K) -> SwipeCard {
        let measure = Rc::clone(&this.measure);
        let measured_key = key.clone();
        let card = SwipeCard::new(&this.runtime, this.settings, move || {
            measure(&measured_key)
        });
        let weak: Weak<Self> = Rc::downgrade(this);
        let committed_key = key.clone();
        card.set_on_outcome(move |direction| {
            if let Some(deck) = weak.upgrade() {
                Self::remove_committed(&deck, &committed_key, direction);
            }
        });
        log::trace!("mounted card {key:?}");
        card
    }

    /// Runs on the main context once a card has committed.
    fn remove_committed(this: &Rc<Self>, key: &K, direction: SwipeDirection) {
        let removed = {
            let mut entries = this.entries.borrow_mut();
            entries
                .iter()
                .position(|entry| &entry.key == key)
                .map(|index| entries.remove(index))
        };
        let Some(removed) = removed else {
            log::debug!("committed card {key:?} already left the deck");
            return;
        };
        log::debug!("card {key:?} swiped {direction:?}");
        Self::sync_window(this);

        let slot = match direction {
            SwipeDirection::Left => &this.on_swipe_left,
            SwipeDirection::Right => &this.on_swipe_right,
        };
        // Taken out while running so the callback may touch the deck.
        let callback = slot.borrow_mut().take();
        if let Some(mut callback) = callback {
            callback(removed.item);
            let mut slot = slot.borrow_mut();
            if slot.is_none() {
                *slot = Some(callback);
            }
        }
    }
}

impl<T: 'static, K: Debug + 'static> Debug for SwipeDeck<T, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries = self.inner.entries.borrow();
        f.debug_struct("SwipeDeck")
            .field(
                "keys",
                &entries.iter().map(|entry| &entry.key).collect::<Vec<_>>(),
            )
            .field("visible_count", &self.inner.settings.visible_count)
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/deck_tests.rs"]
mod tests;
