//! Keyed page list on top of a [`CarouselEngine`].

use std::fmt::Debug;
use std::hash::Hash;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use swipekit_core::RuntimeHandle;

use crate::engine::CarouselEngine;
use crate::indicator::{dot_style, DotStyle, IndicatorStyle};
use crate::settings::CarouselSettings;

/// Render snapshot of one page.
#[derive(Clone, Debug, PartialEq)]
pub struct PageFrame<K, S> {
    pub key: K,
    pub index: usize,
    pub height: f32,
    pub source: S,
}

pub type Dots = SmallVec<[DotStyle; 8]>;

pub struct Carousel<T, K, S> {
    engine: CarouselEngine,
    items: Vec<T>,
    key_of: Box<dyn Fn(&T) -> K>,
    source_of: Box<dyn Fn(&T) -> S>,
    index_by_key: FxHashMap<K, usize>,
    indicator: IndicatorStyle,
}

impl<T, K, S> Carousel<T, K, S>
where
    K: Clone + Eq + Hash + Debug,
{
    pub fn new(
        runtime: &RuntimeHandle,
        items: Vec<T>,
        key_of: impl Fn(&T) -> K + 'static,
        source_of: impl Fn(&T) -> S + 'static,
        settings: CarouselSettings,
    ) -> Self {
        let mut carousel = Self {
            engine: CarouselEngine::new(runtime, 0, settings),
            items: Vec::new(),
            key_of: Box::new(key_of),
            source_of: Box::new(source_of),
            index_by_key: FxHashMap::default(),
            indicator: IndicatorStyle::default(),
        };
        carousel.set_items(items);
        carousel
    }

    pub fn with_indicator_style(mut self, style: IndicatorStyle) -> Self {
        self.indicator = style;
        self
    }

    pub fn engine(&self) -> &CarouselEngine {
        &self.engine
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn index_of(&self, key: &K) -> Option<usize> {
        self.index_by_key.get(key).copied()
    }

    /// Item of the page the carousel last settled on.
    pub fn current_item(&self) -> Option<&T> {
        self.items.get(self.engine.settled_index())
    }

    /// Replaces the pages. Items with a duplicate key are dropped.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.index_by_key.clear();
        self.items.clear();
        for item in items {
            let key = (self.key_of)(&item);
            if self.index_by_key.contains_key(&key) {
                log::warn!("duplicate carousel key {key:?}, dropping item");
                continue;
            }
            self.index_by_key.insert(key, self.items.len());
            self.items.push(item);
        }
        self.engine.set_page_count(self.items.len());
    }

    /// Snaps to the page with `key`; false when no such page exists.
    pub fn animate_to_key(&self, key: &K) -> bool {
        match self.index_of(key) {
            Some(index) => {
                self.engine.animate_to_index(index);
                true
            }
            None => false,
        }
    }

    pub fn pages(&self) -> Vec<PageFrame<K, S>> {
        self.items
            .iter()
            .enumerate()
            .map(|(index, item)| PageFrame {
                key: (self.key_of)(item),
                index,
                height: self.engine.page_height(index),
                source: (self.source_of)(item),
            })
            .collect()
    }

    pub fn dots(&self) -> Dots {
        let animated_index = self.engine.animated_index();
        (0..self.items.len())
            .map(|index| dot_style(animated_index, index, &self.indicator))
            .collect()
    }
}

impl<T, K: Debug, S> Debug for Carousel<T, K, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Carousel")
            .field("pages", &self.items.len())
            .field("engine", &self.engine)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swipekit_testing::TestRuntime;

    #[derive(Clone, Debug, PartialEq)]
    struct Photo {
        id: &'static str,
        url: &'static str,
    }

    fn photos(ids: &[&'static str]) -> Vec<Photo> {
        ids.iter()
            .map(|&id| Photo {
                id,
                url: "https://example.invalid/photo.jpg",
            })
            .collect()
    }

    type PhotoCarousel = Carousel<Photo, &'static str, &'static str>;

    fn carousel(harness: &TestRuntime, ids: &[&'static str]) -> PhotoCarousel {
        Carousel::new(
            &harness.handle(),
            photos(ids),
            |photo: &Photo| photo.id,
            |photo: &Photo| photo.url,
            CarouselSettings::default(),
        )
    }

    #[test]
    fn pages_carry_keys_sources_and_heights() {
        let harness = TestRuntime::new();
        let carousel = carousel(&harness, &["a", "b", "c"]);
        carousel.engine().on_drag_begin();
        carousel.engine().on_drag_update(60.0);

        let pages = carousel.pages();
        let keys: Vec<&str> = pages.iter().map(|page| page.key).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
        assert_eq!(pages[0].height, 330.0);
        assert_eq!(pages[1].height, 300.0);
        assert_eq!(pages[2].source, "https://example.invalid/photo.jpg");
    }

    #[test]
    fn dots_follow_the_animated_index() {
        let harness = TestRuntime::new();
        let carousel = carousel(&harness, &["a", "b", "c"]);
        carousel.engine().on_drag_begin();
        carousel.engine().on_drag_update(-150.0);

        let dots = carousel.dots();
        assert_eq!(dots.len(), 3);
        assert_eq!(dots[0].height, 11.0);
        assert_eq!(dots[1].height, 11.0);
        assert_eq!(dots[2].height, 6.0);
    }

    #[test]
    fn duplicate_keys_are_dropped() {
        let harness = TestRuntime::new();
        let carousel = carousel(&harness, &["a", "b", "a"]);
        assert_eq!(carousel.len(), 2);
        assert_eq!(carousel.engine().page_count(), 2);
        assert_eq!(carousel.index_of(&"b"), Some(1));
    }

    #[test]
    fn animate_to_key_snaps_to_the_page() {
        let harness = TestRuntime::new();
        let carousel = carousel(&harness, &["a", "b", "c"]);
        assert!(carousel.animate_to_key(&"c"));
        assert!(!carousel.animate_to_key(&"zz"));
        harness.run_until_idle();
        assert_eq!(carousel.engine().position(), -600.0);
        assert_eq!(carousel.current_item().map(|photo| photo.id), Some("c"));
    }

    #[test]
    fn replacing_items_updates_the_page_count() {
        let harness = TestRuntime::new();
        let mut carousel = carousel(&harness, &["a", "b", "c", "d"]);
        carousel.engine().animate_to_index(3);
        harness.run_until_idle();

        carousel.set_items(photos(&["a", "b"]));
        assert_eq!(carousel.engine().page_count(), 2);
        assert_eq!(carousel.engine().position(), -300.0);
        assert!(carousel.index_of(&"d").is_none());
    }
}
