//! Section navigation for a single-page site: which page is visible, which
//! menu item is selected, where the indicator sits, and how that state maps
//! to the URL and durable storage.

pub mod command;
pub mod controller;
pub mod dom;
pub mod geometry;
pub mod history;
pub mod indicator;
pub mod menu;
pub mod registry;
pub mod render;
pub mod runtime;
pub mod section;
pub mod storage;

pub use command::Command;
pub use controller::{NavMsg, Navigator, Phase, TransitionState};
pub use dom::{Document, Element, ElementRef, MemoryDocument, Rect};
pub use history::{History, HistoryBridge, MemoryHistory, UrlResolution, UrlTarget};
pub use indicator::{IndicatorScheduler, IndicatorTarget, Track};
pub use registry::SectionRegistry;
pub use render::{RenderHooks, SectionRenderer};
pub use runtime::{FontStatus, NavRuntime};
pub use section::{IconGroupId, SectionId, TransitionRequest};
pub use storage::{FileStorage, MemoryStorage, Storage};
