#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use img2pdf_engine::{
    ConvertRequest, ConvertSettings, EngineEvent, ProgressSink, Stage, SubmissionProgress,
    UploadFile,
};

#[derive(Default)]
pub struct TestSink {
    events: Arc<Mutex<Vec<EngineEvent>>>,
}

impl TestSink {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn take(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }

    pub fn stages(&self) -> Vec<Stage> {
        self.take()
            .into_iter()
            .filter_map(|event| match event {
                EngineEvent::Progress(SubmissionProgress { stage, .. }) => Some(stage),
                _ => None,
            })
            .collect()
    }
}

impl ProgressSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

pub fn settings_for(base_url: String) -> ConvertSettings {
    ConvertSettings {
        base_url,
        converting_hint_after: Duration::from_secs(30),
        ..ConvertSettings::default()
    }
}

pub fn write_image(dir: &Path, name: &str, content: &[u8]) -> UploadFile {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    UploadFile {
        name: name.to_string(),
        mime_type: "image/png".to_string(),
        path,
    }
}

pub fn request(files: Vec<UploadFile>, convert_type: &str, filename: &str) -> ConvertRequest {
    ConvertRequest {
        files,
        convert_type: convert_type.to_string(),
        filename: filename.to_string(),
        quality: 95,
    }
}
