//! The embedded web-rendering surface, as seen by the session engine.
//!
//! The engine itself (loading, rendering, script execution) lives outside
//! this workspace. Everything here reads it through [`WebSurface`].

use async_trait::async_trait;

/// Point-in-time view of the surface's observable properties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceState {
    pub url: Option<String>,
    pub title: Option<String>,
    pub is_loading: bool,
    pub progress: f64,
    pub can_go_back: bool,
    pub can_go_forward: bool,
    /// Back list, oldest first
    pub back_entries: Vec<String>,
    /// Forward list, nearest first
    pub forward_entries: Vec<String>,
}

#[async_trait]
pub trait WebSurface: Send + Sync {
    fn load(&self, url: &str);
    fn reload(&self);
    fn go_back(&self);
    fn go_forward(&self);

    fn state(&self) -> SurfaceState;

    /// Reads the title straight from the rendered document. Used when the
    /// surface's own title property has not caught up yet.
    async fn document_title(&self) -> Option<String>;

    /// Encoded snapshot of the visible page for the tab grid.
    fn capture_preview(&self) -> Option<Vec<u8>>;

    fn current_url(&self) -> Option<String> {
        self.state().url
    }
}

#[cfg(any(test, feature = "test-util"))]
pub mod testing {
    //! Scriptable in-memory surface for tests.

    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    pub struct FakeSurface {
        state: Mutex<SurfaceState>,
        document_title: Mutex<Option<String>>,
        /// When set, querying the document title navigates here first,
        /// simulating the user leaving during the fallback query.
        navigate_on_title_query: Mutex<Option<String>>,
        preview: Mutex<Option<Vec<u8>>>,
        loads: Mutex<Vec<String>>,
        reloads: Mutex<usize>,
    }

    impl FakeSurface {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_state(&self, state: SurfaceState) {
            *self.state.lock() = state;
        }

        pub fn update(&self, f: impl FnOnce(&mut SurfaceState)) {
            f(&mut self.state.lock());
        }

        pub fn set_url(&self, url: &str) {
            self.state.lock().url = Some(url.to_string());
        }

        pub fn set_title(&self, title: Option<&str>) {
            self.state.lock().title = title.map(str::to_string);
        }

        pub fn set_document_title(&self, title: Option<&str>) {
            *self.document_title.lock() = title.map(str::to_string);
        }

        pub fn navigate_on_title_query(&self, url: &str) {
            *self.navigate_on_title_query.lock() = Some(url.to_string());
        }

        pub fn set_preview(&self, bytes: Option<Vec<u8>>) {
            *self.preview.lock() = bytes;
        }

        /// Every URL passed to `load`, in order
        pub fn loads(&self) -> Vec<String> {
            self.loads.lock().clone()
        }

        pub fn reload_count(&self) -> usize {
            *self.reloads.lock()
        }
    }

    #[async_trait]
    impl WebSurface for FakeSurface {
        fn load(&self, url: &str) {
            self.loads.lock().push(url.to_string());
            let mut state = self.state.lock();
            state.url = Some(url.to_string());
            state.title = None;
        }

        fn reload(&self) {
            *self.reloads.lock() += 1;
        }

        fn go_back(&self) {
            let mut state = self.state.lock();
            if let Some(previous) = state.back_entries.pop() {
                if let Some(current) = state.url.replace(previous) {
                    state.forward_entries.insert(0, current);
                }
            }
        }

        fn go_forward(&self) {
            let mut state = self.state.lock();
            if !state.forward_entries.is_empty() {
                let next = state.forward_entries.remove(0);
                if let Some(current) = state.url.replace(next) {
                    state.back_entries.push(current);
                }
            }
        }

        fn state(&self) -> SurfaceState {
            self.state.lock().clone()
        }

        async fn document_title(&self) -> Option<String> {
            if let Some(url) = self.navigate_on_title_query.lock().take() {
                self.set_url(&url);
            }
            self.document_title.lock().clone()
        }

        fn capture_preview(&self) -> Option<Vec<u8>> {
            self.preview.lock().clone()
        }
    }
}
