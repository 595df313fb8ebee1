#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use portal::error::{PortalError, Result};
use portal::query::FilterCriteria;
use portal::remote::CatalogGateway;
use portal::types::{CatalogItem, CatalogPage, EntityRef, Gender, ItemId, LifeStatus, PageInfo};
use portal::{CatalogController, ControllerOptions};
use tokio::sync::Notify;

pub const API: &str = "https://rickandmortyapi.com/api";

pub fn location_url(id: u32) -> String {
    format!("{API}/location/{id}")
}

pub fn episode_url(id: u32) -> String {
    format!("{API}/episode/{id}")
}

/// Build a character with a location and a single episode
pub fn item(id: ItemId, name: &str, status: LifeStatus, location: Option<&str>) -> CatalogItem {
    CatalogItem {
        id,
        name: name.to_string(),
        status,
        species: "Human".to_string(),
        subtype: String::new(),
        gender: Gender::Male,
        origin: EntityRef::default(),
        location: EntityRef {
            name: "inline".to_string(),
            url: location.unwrap_or_default().to_string(),
        },
        image: String::new(),
        episodes: vec![episode_url(1)],
        url: format!("{API}/character/{id}"),
        created: String::new(),
    }
}

/// A page of `items`. `has_next` controls the server's `info.next`.
pub fn page(items: Vec<CatalogItem>, has_next: bool) -> CatalogPage {
    CatalogPage {
        info: PageInfo {
            count: items.len() as u64,
            pages: 1,
            next: has_next.then(|| format!("{API}/character/?page=2")),
            prev: None,
        },
        results: items,
    }
}

/// `count` alive characters numbered from `first_id`, all at location 1.
pub fn numbered(first_id: ItemId, count: usize, status: LifeStatus) -> Vec<CatalogItem> {
    (0..count as u64)
        .map(|offset| {
            let id = first_id + offset;
            item(id, &format!("Character {id}"), status, Some(&location_url(1)))
        })
        .collect()
}

#[derive(Clone)]
pub enum PageReply {
    Page(CatalogPage),
    Fail(String),
    /// Non-2xx reply with this status code
    Status(u16),
    /// Never completes
    Hang,
}

#[derive(Clone)]
pub enum NameReply {
    Name(String),
    Fail,
    /// Never completes
    Hang,
}

struct Scripted<R> {
    /// Replies served in order; the last one repeats
    replies: VecDeque<R>,
    gate: Option<Arc<Notify>>,
}

impl<R: Clone> Scripted<R> {
    fn next_reply(&mut self) -> Option<R> {
        if self.replies.len() > 1 {
            self.replies.pop_front()
        } else {
            self.replies.front().cloned()
        }
    }
}

/// Scripted in-memory gateway. Unscripted requests fail.
#[derive(Default)]
pub struct MockGateway {
    pages: Mutex<HashMap<(FilterCriteria, u32), Scripted<PageReply>>>,
    names: Mutex<HashMap<String, Scripted<NameReply>>>,
    items: Mutex<HashMap<ItemId, CatalogItem>>,
    page_calls: Mutex<Vec<(FilterCriteria, u32)>>,
    name_calls: Mutex<Vec<String>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_page(&self, criteria: &FilterCriteria, page: u32, reply: PageReply) {
        self.script_page_gated(criteria, page, reply, None);
    }

    /// The reply is held back until `gate` is notified
    pub fn script_page_gated(
        &self,
        criteria: &FilterCriteria,
        page: u32,
        reply: PageReply,
        gate: Option<Arc<Notify>>,
    ) {
        let mut pages = self.pages.lock().unwrap();
        let entry = pages
            .entry((criteria.clone(), page))
            .or_insert_with(|| Scripted {
                replies: VecDeque::new(),
                gate: None,
            });
        entry.replies.push_back(reply);
        if gate.is_some() {
            entry.gate = gate;
        }
    }

    pub fn script_name(&self, url: &str, reply: NameReply) {
        self.script_name_gated(url, reply, None);
    }

    pub fn script_name_gated(&self, url: &str, reply: NameReply, gate: Option<Arc<Notify>>) {
        let mut names = self.names.lock().unwrap();
        let entry = names.entry(url.to_string()).or_insert_with(|| Scripted {
            replies: VecDeque::new(),
            gate: None,
        });
        entry.replies.push_back(reply);
        if gate.is_some() {
            entry.gate = gate;
        }
    }

    pub fn script_item(&self, item: CatalogItem) {
        self.items.lock().unwrap().insert(item.id, item);
    }

    pub fn page_calls(&self) -> Vec<(FilterCriteria, u32)> {
        self.page_calls.lock().unwrap().clone()
    }

    /// Number of name fetches issued for `url`
    pub fn name_calls(&self, url: &str) -> usize {
        self.name_calls
            .lock()
            .unwrap()
            .iter()
            .filter(|called| called.as_str() == url)
            .count()
    }
}

impl CatalogGateway for MockGateway {
    async fn fetch_page(&self, page: u32, criteria: &FilterCriteria) -> Result<CatalogPage> {
        self.page_calls
            .lock()
            .unwrap()
            .push((criteria.clone(), page));

        let scripted = {
            let mut pages = self.pages.lock().unwrap();
            pages
                .get_mut(&(criteria.clone(), page))
                .and_then(|s| s.next_reply().map(|reply| (reply, s.gate.clone())))
        };
        let Some((reply, gate)) = scripted else {
            return Err(PortalError::Other(format!("unscripted page {page}")));
        };

        if let Some(gate) = gate {
            gate.notified().await;
        }

        match reply {
            PageReply::Page(page) => Ok(page),
            PageReply::Fail(message) => Err(PortalError::Other(message)),
            PageReply::Status(code) => Err(PortalError::Status {
                status: reqwest::StatusCode::from_u16(code).unwrap(),
                url: format!("{API}/character/?page={page}"),
            }),
            PageReply::Hang => std::future::pending().await,
        }
    }

    async fn fetch_entity_name(&self, url: &str) -> Result<String> {
        self.name_calls.lock().unwrap().push(url.to_string());

        let scripted = {
            let mut names = self.names.lock().unwrap();
            names
                .get_mut(url)
                .and_then(|s| s.next_reply().map(|reply| (reply, s.gate.clone())))
        };
        let Some((reply, gate)) = scripted else {
            return Err(PortalError::Other(format!("unscripted url {url}")));
        };

        if let Some(gate) = gate {
            gate.notified().await;
        }

        match reply {
            NameReply::Name(name) => Ok(name),
            NameReply::Fail => Err(PortalError::Other(format!("lookup of {url} failed"))),
            NameReply::Hang => std::future::pending().await,
        }
    }

    async fn fetch_item(&self, id: ItemId) -> Result<CatalogItem> {
        self.items
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(PortalError::ItemNotFound(id))
    }
}

pub fn options(page_size: usize) -> ControllerOptions {
    ControllerOptions {
        page_size,
        fetch_timeout: Duration::from_secs(5),
        enrichment_concurrency: 4,
    }
}

/// A controller over `gateway` that the test keeps a handle to
pub fn controller(
    gateway: &Arc<MockGateway>,
    page_size: usize,
) -> CatalogController<MockGateway> {
    CatalogController::with_shared(Arc::clone(gateway), options(page_size))
}

pub fn ids(items: &[CatalogItem]) -> Vec<ItemId> {
    items.iter().map(|item| item.id).collect()
}

/// Runs the portal binary with its configuration isolated in a temp directory
pub struct PortalCli {
    pub temp_dir: tempfile::TempDir,
}

impl PortalCli {
    pub fn new() -> Self {
        PortalCli {
            temp_dir: tempfile::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    pub fn config_path(&self) -> std::path::PathBuf {
        self.temp_dir.path().join("config.yaml")
    }

    pub fn write_config(&self, content: &str) {
        std::fs::write(self.config_path(), content).expect("Failed to write config");
    }

    pub fn command(&self) -> std::process::Command {
        let mut command = std::process::Command::new(env!("CARGO_BIN_EXE_portal"));
        command
            .current_dir(self.temp_dir.path())
            .env("PORTAL_CONFIG", self.config_path())
            .env_remove("PORTAL_API_URL")
            .env_remove("PORTAL_LOG");
        command
    }

    pub fn run(&self, args: &[&str]) -> std::process::Output {
        self.command()
            .args(args)
            .output()
            .expect("Failed to execute portal")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "Command {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(!output.status.success(), "Command {:?} succeeded", args);
        String::from_utf8_lossy(&output.stderr).to_string()
    }
}
