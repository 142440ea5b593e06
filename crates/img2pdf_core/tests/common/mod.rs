#![allow(dead_code)]

use std::sync::Once;

use img2pdf_core::{update, AppState, Effect, FileHandle, Msg, SourceFile};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

pub fn image(name: &str, size: u64, modified: i64) -> SourceFile {
    SourceFile {
        name: name.to_string(),
        byte_size: size,
        mime_type: "image/png".to_string(),
        last_modified_ms: modified,
        handle: FileHandle::new(format!("/pics/{name}")),
    }
}

pub fn other(name: &str, mime: &str) -> SourceFile {
    SourceFile {
        name: name.to_string(),
        byte_size: 10,
        mime_type: mime.to_string(),
        last_modified_ms: 0,
        handle: FileHandle::new(format!("/docs/{name}")),
    }
}

pub fn pick(state: AppState, files: Vec<SourceFile>) -> (AppState, Vec<Effect>) {
    update(state, Msg::FilesPicked(files))
}

pub fn names(state: &AppState) -> Vec<String> {
    state.files().iter().map(|f| f.name.clone()).collect()
}
