//! Shared fixtures: an in-process backend and a scripted prompter.

#![allow(dead_code)]

use api_mock::{MockServer, MockState, RecordedRequest};
use clinic_core::{ApiClient, AppStore, ClientConfig, Prompter};
use std::sync::{Arc, Mutex};

pub struct Backend {
    pub server: MockServer,
    pub client: ApiClient,
}

impl Backend {
    pub async fn start() -> Self {
        let server = MockServer::spawn(MockState::new())
            .await
            .expect("mock backend should start");
        let cfg = ClientConfig::for_backend(&server.base_url()).expect("valid backend url");
        let client = ApiClient::new(Arc::new(cfg));
        Self { server, client }
    }

    pub fn state(&self) -> &MockState {
        self.server.state()
    }

    pub fn app_store(&self) -> AppStore {
        AppStore::new(self.client.clone())
    }

    pub fn requests_with_method(&self, method: &str) -> Vec<RecordedRequest> {
        self.state()
            .requests()
            .into_iter()
            .filter(|r| r.method == method)
            .collect()
    }
}

/// Answers every confirmation the same way and remembers what it showed.
#[derive(Default)]
pub struct TestPrompter {
    answer: bool,
    pub questions: Mutex<Vec<String>>,
    pub notices: Mutex<Vec<String>>,
}

impl TestPrompter {
    pub fn accepting() -> Arc<Self> {
        Arc::new(Self {
            answer: true,
            ..Self::default()
        })
    }

    pub fn declining() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn notices(&self) -> Vec<String> {
        self.notices.lock().unwrap().clone()
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().unwrap().clone()
    }
}

impl Prompter for TestPrompter {
    fn confirm(&self, question: &str) -> bool {
        self.questions.lock().unwrap().push(question.to_owned());
        self.answer
    }

    fn notify(&self, message: &str) {
        self.notices.lock().unwrap().push(message.to_owned());
    }
}
