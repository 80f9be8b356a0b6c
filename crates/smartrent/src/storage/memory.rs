//! In-memory storage with optional JSON snapshot persistence.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use super::query::{AlertFilters, ListOptions, Page};
use super::traits::{AlertRepository, DepartmentRepository, UserRepository};
use crate::entities::{Alert, AlertStats, Department, User};
use crate::errors::{SmartRentError, SmartRentResult};

/// On-disk snapshot layout
#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    #[serde(default)]
    users: Vec<User>,
    #[serde(default)]
    departments: Vec<Department>,
    #[serde(default)]
    alerts: Vec<Alert>,
}

#[derive(Debug, Default, Clone)]
struct StoreData {
    users: BTreeMap<String, User>,
    departments: BTreeMap<String, Department>,
    alerts: BTreeMap<String, Alert>,
}

impl StoreData {
    /// Build the maps, rejecting alerts that break the entity rules
    fn from_snapshot(snapshot: Snapshot) -> SmartRentResult<Self> {
        let mut alerts = BTreeMap::new();
        for alert in snapshot.alerts {
            let Some(id) = alert.id().map(ToString::to_string) else {
                warn!(title = alert.title(), "Skipping snapshot alert without an id");
                continue;
            };
            alert
                .validate()
                .map_err(|err| SmartRentError::JsonParseError {
                    reason: format!("alert '{id}': {err}"),
                })?;
            alerts.insert(id, alert);
        }

        Ok(Self {
            users: snapshot
                .users
                .into_iter()
                .map(|u| (u.id.clone(), u))
                .collect(),
            departments: snapshot
                .departments
                .into_iter()
                .map(|d| (d.id.clone(), d))
                .collect(),
            alerts,
        })
    }

    fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            users: self.users.values().cloned().collect(),
            departments: self.departments.values().cloned().collect(),
            alerts: self.alerts.values().cloned().collect(),
        }
    }

    fn matching<'a>(&'a self, filters: &'a AlertFilters) -> impl Iterator<Item = &'a Alert> + 'a {
        self.alerts.values().filter(move |a| filters.matches(a))
    }
}

/// Repository implementation backed by in-process maps.
///
/// When opened with a snapshot path, the whole data set is loaded at start
/// and rewritten after every successful write.
pub struct MemoryStore {
    data: RwLock<StoreData>,

    /// Path to the JSON snapshot, if persistence is enabled
    snapshot_path: Option<PathBuf>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create an empty, non-persistent store
    pub fn new() -> Self {
        Self {
            data: RwLock::new(StoreData::default()),
            snapshot_path: None,
        }
    }

    /// Open a store backed by a JSON snapshot file.
    ///
    /// A missing file yields an empty store; it is created on first write.
    pub async fn open(path: impl AsRef<Path>) -> SmartRentResult<Self> {
        let path = path.as_ref().to_path_buf();
        let snapshot = match fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str::<Snapshot>(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Snapshot::default(),
            Err(e) => {
                return Err(SmartRentError::FileReadError {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })
            }
        };

        debug!(
            path = %path.display(),
            users = snapshot.users.len(),
            departments = snapshot.departments.len(),
            alerts = snapshot.alerts.len(),
            "Loaded snapshot"
        );

        Ok(Self {
            data: RwLock::new(StoreData::from_snapshot(snapshot)?),
            snapshot_path: Some(path),
        })
    }

    /// Apply a change and persist it; `data` is only touched once the
    /// snapshot write has succeeded. Callers hold the write lock so
    /// snapshots land in commit order.
    async fn commit<R>(
        &self,
        data: &mut StoreData,
        change: impl FnOnce(&mut StoreData) -> R,
    ) -> SmartRentResult<R> {
        if self.snapshot_path.is_none() {
            return Ok(change(data));
        }
        let mut next = data.clone();
        let result = change(&mut next);
        self.persist(&next).await?;
        *data = next;
        Ok(result)
    }

    async fn persist(&self, data: &StoreData) -> SmartRentResult<()> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let content = serde_json::to_string_pretty(&data.to_snapshot())?;
        fs::write(path, content)
            .await
            .map_err(|e| SmartRentError::FileWriteError {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
    }
}

#[async_trait]
impl AlertRepository for MemoryStore {
    async fn create(&self, mut alert: Alert) -> SmartRentResult<Alert> {
        let id = Uuid::new_v4().to_string();
        alert.assign_id(&id);
        alert.set_version(1);

        let mut data = self.data.write().await;
        let saved = alert.clone();
        self.commit(&mut data, |d| {
            d.alerts.insert(id, saved);
        })
        .await?;
        Ok(alert)
    }

    async fn find_by_id(&self, id: &str) -> SmartRentResult<Option<Alert>> {
        Ok(self.data.read().await.alerts.get(id).cloned())
    }

    async fn find_many(
        &self,
        filters: &AlertFilters,
        options: &ListOptions,
    ) -> SmartRentResult<Page<Alert>> {
        let data = self.data.read().await;
        let mut alerts: Vec<Alert> = data.matching(filters).cloned().collect();
        alerts.sort_by(|a, b| options.compare(a, b));
        Ok(Page::from_sorted(alerts, options))
    }

    async fn update(&self, alert: &Alert) -> SmartRentResult<Alert> {
        let id = alert
            .id()
            .ok_or_else(|| SmartRentError::validation("alert has not been saved yet"))?;

        let mut data = self.data.write().await;
        let stored = data
            .alerts
            .get(id)
            .ok_or_else(|| SmartRentError::AlertNotFound {
                alert_id: id.to_string(),
            })?;

        if stored.version() != alert.version() {
            return Err(SmartRentError::VersionConflict {
                alert_id: id.to_string(),
                expected: alert.version(),
            });
        }

        let mut saved = alert.clone();
        saved.set_version(alert.version() + 1);
        let record = saved.clone();
        self.commit(&mut data, |d| {
            d.alerts.insert(id.to_string(), record);
        })
        .await?;
        Ok(saved)
    }

    async fn search_by_text(
        &self,
        term: &str,
        filters: &AlertFilters,
        options: &ListOptions,
    ) -> SmartRentResult<Page<Alert>> {
        let data = self.data.read().await;
        let mut alerts: Vec<Alert> = data
            .matching(filters)
            .filter(|a| a.matches_text(term))
            .cloned()
            .collect();
        alerts.sort_by(|a, b| options.compare(a, b));
        Ok(Page::from_sorted(alerts, options))
    }

    async fn get_stats(&self, filters: &AlertFilters) -> SmartRentResult<AlertStats> {
        let data = self.data.read().await;
        Ok(AlertStats::compute(data.matching(filters), Utc::now()))
    }

    async fn count(&self, filters: &AlertFilters) -> SmartRentResult<u64> {
        Ok(self.data.read().await.matching(filters).count() as u64)
    }

    async fn delete(&self, id: &str) -> SmartRentResult<bool> {
        let mut data = self.data.write().await;
        if !data.alerts.contains_key(id) {
            return Ok(false);
        }
        self.commit(&mut data, |d| d.alerts.remove(id).is_some())
            .await
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: &str) -> SmartRentResult<Option<User>> {
        Ok(self.data.read().await.users.get(id).cloned())
    }

    async fn create(&self, user: User) -> SmartRentResult<User> {
        let mut data = self.data.write().await;
        let stored = user.clone();
        self.commit(&mut data, |d| {
            d.users.insert(stored.id.clone(), stored);
        })
        .await?;
        Ok(user)
    }
}

#[async_trait]
impl DepartmentRepository for MemoryStore {
    async fn find_by_id(&self, id: &str) -> SmartRentResult<Option<Department>> {
        Ok(self.data.read().await.departments.get(id).cloned())
    }

    async fn find_by_code(&self, code: &str) -> SmartRentResult<Option<Department>> {
        Ok(self
            .data
            .read()
            .await
            .departments
            .values()
            .find(|d| d.code == code)
            .cloned())
    }

    async fn list(&self) -> SmartRentResult<Vec<Department>> {
        let mut departments: Vec<Department> =
            self.data.read().await.departments.values().cloned().collect();
        departments.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(departments)
    }

    async fn create(&self, department: Department) -> SmartRentResult<Department> {
        let mut data = self.data.write().await;
        let stored = department.clone();
        self.commit(&mut data, |d| {
            d.departments.insert(stored.id.clone(), stored);
        })
        .await?;
        Ok(department)
    }

    async fn update(&self, department: &Department) -> SmartRentResult<()> {
        let mut data = self.data.write().await;
        if !data.departments.contains_key(&department.id) {
            return Err(SmartRentError::DepartmentNotFound {
                department_id: department.id.clone(),
            });
        }
        let stored = department.clone();
        self.commit(&mut data, |d| {
            d.departments.insert(stored.id.clone(), stored);
        })
        .await
    }

    async fn delete(&self, id: &str) -> SmartRentResult<bool> {
        let mut data = self.data.write().await;
        if !data.departments.contains_key(id) {
            return Ok(false);
        }
        self.commit(&mut data, |d| d.departments.remove(id).is_some())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{AlertCategory, AlertPriority, AlertStatus, NewAlert, UserRole};
    use crate::errors::ErrorKind;
    use serde_json::json;
    use tempfile::TempDir;

    fn new_alert(title: &str) -> Alert {
        Alert::new(NewAlert {
            title: title.to_string(),
            description: "Water on the bathroom floor".to_string(),
            category: AlertCategory::Maintenance,
            priority: AlertPriority::High,
            reporter_id: "U1".to_string(),
            department_id: "D1".to_string(),
            images: Vec::new(),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_version() {
        let store = MemoryStore::new();
        let alert = AlertRepository::create(&store, new_alert("Leak")).await.unwrap();
        assert!(alert.id().is_some());
        assert_eq!(alert.version(), 1);

        let loaded = AlertRepository::find_by_id(&store, alert.id().unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.title(), "Leak");
    }

    #[tokio::test]
    async fn test_update_bumps_version_and_rejects_stale_writes() {
        let store = MemoryStore::new();
        let created = AlertRepository::create(&store, new_alert("Leak")).await.unwrap();

        let mut first = created.clone();
        first.transition_to(AlertStatus::InProgress).unwrap();
        let saved = AlertRepository::update(&store, &first).await.unwrap();
        assert_eq!(saved.version(), 2);

        let mut stale = created;
        stale.transition_to(AlertStatus::Cancelled).unwrap();
        let err = AlertRepository::update(&store, &stale).await.unwrap_err();
        assert!(matches!(err, SmartRentError::VersionConflict { .. }));

        let current = AlertRepository::find_by_id(&store, saved.id().unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(current.status(), AlertStatus::InProgress);
    }

    #[tokio::test]
    async fn test_search_and_count() {
        let store = MemoryStore::new();
        AlertRepository::create(&store, new_alert("Leaking pipe")).await.unwrap();
        AlertRepository::create(&store, new_alert("Broken door")).await.unwrap();

        let filters = AlertFilters::default();
        let page = store
            .search_by_text("leak", &filters, &ListOptions::default())
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(store.count(&filters).await.unwrap(), 2);

        let stats = store.get_stats(&filters).await.unwrap();
        assert_eq!(stats.total, 2);
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemoryStore::new();
        let alert = AlertRepository::create(&store, new_alert("Leak")).await.unwrap();
        let id = alert.id().unwrap().to_string();
        assert!(AlertRepository::delete(&store, &id).await.unwrap());
        assert!(!AlertRepository::delete(&store, &id).await.unwrap());
    }

    #[tokio::test]
    async fn test_snapshot_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data").join("smartrent.json");

        let store = MemoryStore::open(&path).await.unwrap();
        UserRepository::create(&store, User::new("U1", "Ana", "ana@example.com", UserRole::User))
            .await
            .unwrap();
        DepartmentRepository::create(&store, Department::new("D1", "A-101", "Unit 101", ""))
            .await
            .unwrap();
        let alert = AlertRepository::create(&store, new_alert("Leak")).await.unwrap();
        assert!(path.exists());

        let reopened = MemoryStore::open(&path).await.unwrap();
        assert!(UserRepository::exists(&reopened, "U1").await.unwrap());
        assert!(DepartmentRepository::find_by_code(&reopened, "A-101")
            .await
            .unwrap()
            .is_some());
        let loaded = AlertRepository::find_by_id(&reopened, alert.id().unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.version(), 1);
    }

    #[tokio::test]
    async fn test_open_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = MemoryStore::open(temp_dir.path().join("absent.json"))
            .await
            .unwrap();
        assert!(DepartmentRepository::list(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_open_rejects_corrupt_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.json");
        std::fs::write(&path, "not json").unwrap();
        let err = MemoryStore::open(&path).await.err().unwrap();
        assert!(matches!(err, SmartRentError::JsonParseError { .. }));
    }

    #[tokio::test]
    async fn test_resolved_at_stable_across_saves() {
        let store = MemoryStore::new();
        let mut alert = AlertRepository::create(&store, new_alert("Leak")).await.unwrap();
        alert.transition_to(AlertStatus::InProgress).unwrap();
        let mut alert = AlertRepository::update(&store, &alert).await.unwrap();
        alert.transition_to(AlertStatus::Resolved).unwrap();
        let mut alert = AlertRepository::update(&store, &alert).await.unwrap();
        let resolved_at = alert.resolved_at().unwrap();

        alert.add_note("checked again", "A1").unwrap();
        let mut alert = AlertRepository::update(&store, &alert).await.unwrap();
        alert.assign_to("S2");
        alert.update_priority(AlertPriority::Low);
        let alert = AlertRepository::update(&store, &alert).await.unwrap();

        let loaded = AlertRepository::find_by_id(&store, alert.id().unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.resolved_at(), Some(resolved_at));
        assert_eq!(loaded.version(), 5);
    }

    #[tokio::test]
    async fn test_failed_snapshot_write_leaves_store_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("smartrent.json");
        let store = MemoryStore::open(&path).await.unwrap();
        let created = AlertRepository::create(&store, new_alert("Leak")).await.unwrap();
        let id = created.id().unwrap().to_string();

        // A directory in place of the snapshot makes every write fail
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        let mut edited = created.clone();
        edited.transition_to(AlertStatus::InProgress).unwrap();
        let err = AlertRepository::update(&store, &edited).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);

        let current = AlertRepository::find_by_id(&store, &id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(current.status(), AlertStatus::Pending);
        assert_eq!(current.version(), 1);

        assert!(AlertRepository::create(&store, new_alert("Other")).await.is_err());
        assert!(AlertRepository::delete(&store, &id).await.is_err());
        assert_eq!(store.count(&AlertFilters::default()).await.unwrap(), 1);

        std::fs::remove_dir(&path).unwrap();
        let saved = AlertRepository::update(&store, &edited).await.unwrap();
        assert_eq!(saved.status(), AlertStatus::InProgress);
        assert_eq!(saved.version(), 2);
    }

    #[tokio::test]
    async fn test_open_rejects_invalid_alert_records() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("smartrent.json");

        let mut alert = new_alert("Leak");
        alert.assign_id("a1");
        let mut record = serde_json::to_value(&alert).unwrap();
        record["images"] = json!(["1.jpg", "2.jpg", "3.jpg", "4.jpg"]);
        std::fs::write(&path, json!({ "alerts": [record] }).to_string()).unwrap();

        let err = MemoryStore::open(&path).await.err().unwrap();
        assert!(matches!(err, SmartRentError::JsonParseError { .. }));
        assert!(err.to_string().contains("a1"));
    }

    #[tokio::test]
    async fn test_open_skips_alerts_without_id() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("smartrent.json");
        let record = serde_json::to_value(new_alert("Leak")).unwrap();
        std::fs::write(&path, json!({ "alerts": [record] }).to_string()).unwrap();

        let store = MemoryStore::open(&path).await.unwrap();
        assert_eq!(store.count(&AlertFilters::default()).await.unwrap(), 0);
    }
}
