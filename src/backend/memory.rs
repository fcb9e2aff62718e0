//! In-process knowledge backend

use super::demo::{self, Dataset};
use super::{
    BackendError, BackendResult, DashboardStats, DocumentPage, KnowledgeBackend, NetworkTotals,
    Period, SearchParams, Timeframe, TrendPoint, TypeCount,
};
use crate::auth::AuthResult;
use crate::models::{
    Comment, Document, DocumentReview, DocumentStatus, DocumentType, DocumentUpdate,
    KnowledgeComponent, Membership, MicrolearningModule, NewDocument, NewPerson, NewWorkspace,
    Person, ProfileUpdate, Project, ReviewAction, UserId, ValidationActivity, ValidationStatus,
    Workspace, WorkspaceActivity, WorkspaceMember,
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use indexmap::IndexMap;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

#[derive(Default)]
struct Store {
    users: IndexMap<UserId, Person>,
    documents: IndexMap<Uuid, Document>,
    components: HashMap<Uuid, KnowledgeComponent>,
    projects: HashMap<Uuid, Project>,
    workspaces: IndexMap<Uuid, Workspace>,
    memberships: Vec<Membership>,
    workspace_documents: Vec<(Uuid, Uuid)>,
    comments: Vec<Comment>,
    activities: Vec<WorkspaceActivity>,
    validations: Vec<ValidationActivity>,
    modules: Vec<MicrolearningModule>,
}

impl Store {
    fn next_user_id(&self) -> UserId {
        self.users.keys().max().copied().unwrap_or(0) + 1
    }

    fn matches(doc: &Document, params: &SearchParams, terms: &[String]) -> bool {
        if doc.status != params.effective_status() {
            return false;
        }
        if let Some(kind) = params.filters.document_type {
            if doc.document_type != kind {
                return false;
            }
        }
        if let Some(tag) = &params.filters.tag {
            if !doc.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
                return false;
            }
        }
        if terms.is_empty() {
            return true;
        }
        let haystack = format!(
            "{}\n{}\n{}",
            doc.title.to_lowercase(),
            doc.description.to_lowercase(),
            doc.tags.join("\n").to_lowercase()
        );
        terms.iter().all(|term| haystack.contains(term.as_str()))
    }

    /// Matching documents, newest first
    fn search(&self, params: &SearchParams) -> Vec<&Document> {
        let terms: Vec<String> = params
            .query
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();
        let mut hits: Vec<&Document> = self
            .documents
            .values()
            .filter(|doc| Self::matches(doc, params, &terms))
            .collect();
        hits.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        hits
    }

    fn workspace_docs(&self, workspace: Uuid) -> Vec<&Document> {
        self.workspace_documents
            .iter()
            .filter(|(ws, _)| *ws == workspace)
            .filter_map(|(_, doc)| self.documents.get(doc))
            .collect()
    }

    fn created_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> impl Iterator<Item = &Document> {
        self.documents
            .values()
            .filter(move |d| d.created_at >= start && d.created_at <= end)
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Knowledge backend held entirely in memory
pub struct MemoryBackend {
    store: RwLock<Store>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    /// Empty backend
    pub fn new() -> Self {
        Self {
            store: RwLock::new(Store::default()),
        }
    }

    pub fn from_dataset(data: Dataset) -> Self {
        let store = Store {
            users: data.users.into_iter().map(|u| (u.id, u)).collect(),
            documents: data.documents.into_iter().map(|d| (d.id, d)).collect(),
            components: data.components.into_iter().map(|c| (c.document, c)).collect(),
            projects: data.projects.into_iter().map(|p| (p.id, p)).collect(),
            workspaces: data.workspaces.into_iter().map(|w| (w.id, w)).collect(),
            memberships: data.memberships,
            workspace_documents: data.workspace_documents,
            comments: data.comments,
            activities: data.activities,
            validations: Vec::new(),
            modules: data.modules,
        };
        Self {
            store: RwLock::new(store),
        }
    }

    /// Backend seeded with the demo dataset
    pub fn with_demo_data() -> AuthResult<Self> {
        Ok(Self::from_dataset(demo::dataset()?))
    }

    pub async fn document_count(&self) -> usize {
        self.store.read().await.documents.len()
    }

    /// Review decisions recorded for `document`, oldest first
    pub async fn validation_history(&self, document: Uuid) -> Vec<ValidationActivity> {
        self.store
            .read()
            .await
            .validations
            .iter()
            .filter(|v| v.document == document)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl KnowledgeBackend for MemoryBackend {
    async fn user_by_email(&self, email: &str) -> BackendResult<Option<Person>> {
        let store = self.store.read().await;
        Ok(store
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn user_by_id(&self, id: UserId) -> BackendResult<Option<Person>> {
        Ok(self.store.read().await.users.get(&id).cloned())
    }

    async fn create_user(&self, user: NewPerson) -> BackendResult<Person> {
        let mut store = self.store.write().await;
        if store.users.values().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(BackendError::Conflict(format!("email {} already registered", user.email)));
        }
        let now = Utc::now();
        let id = store.next_user_id();
        let person = Person {
            id,
            email: user.email,
            password: Some(user.password),
            first_name: user.first_name,
            last_name: user.last_name,
            employee_id: user.employee_id,
            role: user.role,
            department: String::new(),
            region: String::new(),
            skills: Vec::new(),
            expertise_level: Default::default(),
            profile_completion: 0,
            is_active: user.is_active,
            last_activity: now,
            created_at: now,
            updated_at: now,
        };
        store.users.insert(id, person.clone());
        debug!(user_id = id, "Created user");
        Ok(person)
    }

    async fn update_user(&self, id: UserId, update: &ProfileUpdate) -> BackendResult<Option<Person>> {
        let mut store = self.store.write().await;
        Ok(store.users.get_mut(&id).map(|person| {
            update.apply(person);
            person.clone()
        }))
    }

    async fn create_document(&self, document: NewDocument) -> BackendResult<Document> {
        let mut store = self.store.write().await;
        if store.documents.contains_key(&document.id) {
            return Err(BackendError::Conflict(format!("document {} exists", document.id)));
        }
        let now = Utc::now();
        let doc = Document {
            id: document.id,
            title: document.title,
            description: document.description,
            content_hash: document.content_hash,
            blockchain_tx_id: None,
            uploader: document.uploader,
            status: document.status,
            document_type: document.document_type,
            quality_score: None,
            metadata: document.metadata,
            tags: Vec::new(),
            summary: None,
            file_url: document.file_url,
            file_size: document.file_size,
            file_type: document.file_type,
            version: 1,
            view_count: 0,
            download_count: 0,
            project: None,
            created_at: now,
            updated_at: now,
            published_at: None,
        };
        store.documents.insert(doc.id, doc.clone());
        Ok(doc)
    }

    async fn document_by_id(&self, id: Uuid) -> BackendResult<Option<Document>> {
        Ok(self.store.read().await.documents.get(&id).cloned())
    }

    async fn update_document(&self, id: Uuid, update: &DocumentUpdate) -> BackendResult<Document> {
        let mut store = self.store.write().await;
        let doc = store.documents.get_mut(&id).ok_or_else(|| BackendError::Status {
            status: 404,
            body: format!("document {} not found", id),
        })?;
        update.apply(doc);
        Ok(doc.clone())
    }

    async fn search_documents(&self, params: &SearchParams) -> BackendResult<DocumentPage> {
        let store = self.store.read().await;
        let hits = store.search(params);
        Ok(DocumentPage {
            total: hits.len() as u64,
            documents: hits
                .into_iter()
                .skip(params.offset())
                .take(params.limit as usize)
                .cloned()
                .collect(),
        })
    }

    async fn recent_documents(&self, limit: usize) -> BackendResult<Vec<Document>> {
        let store = self.store.read().await;
        let mut docs: Vec<&Document> = store
            .documents
            .values()
            .filter(|d| d.status == DocumentStatus::Published)
            .collect();
        docs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(docs.into_iter().take(limit).cloned().collect())
    }

    async fn validate_document(
        &self,
        id: Uuid,
        review: &DocumentReview,
    ) -> BackendResult<Option<Document>> {
        let mut store = self.store.write().await;
        let Some(doc) = store.documents.get_mut(&id) else {
            return Ok(None);
        };
        let previous_status = doc.status;
        let new_status = review.action.resulting_status();
        DocumentUpdate {
            status: Some(new_status),
            ..Default::default()
        }
        .apply(doc);
        let doc = doc.clone();

        if review.action == ReviewAction::Approve {
            if let Some(component) = store.components.get_mut(&id) {
                component.validation_status = ValidationStatus::Validated;
            }
        }
        store.validations.push(ValidationActivity {
            document: id,
            validator: review.validator,
            action: review.action,
            feedback: review.feedback.clone(),
            previous_status,
            new_status,
            created_at: Utc::now(),
        });
        debug!(document = %id, action = ?review.action, "Recorded review");
        Ok(Some(doc))
    }

    async fn pending_validations(&self, page: u32, limit: u32) -> BackendResult<DocumentPage> {
        let store = self.store.read().await;
        let mut pending: Vec<&Document> = store
            .documents
            .values()
            .filter(|d| {
                matches!(d.status, DocumentStatus::PendingReview | DocumentStatus::UnderReview)
            })
            .collect();
        pending.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(DocumentPage::slice(
            pending.into_iter().cloned().collect(),
            page,
            limit,
        ))
    }

    async fn record_view(&self, id: Uuid) -> BackendResult<bool> {
        let mut store = self.store.write().await;
        Ok(match store.documents.get_mut(&id) {
            Some(doc) => {
                doc.view_count += 1;
                true
            }
            None => false,
        })
    }

    async fn record_download(&self, id: Uuid) -> BackendResult<Option<String>> {
        let mut store = self.store.write().await;
        Ok(store.documents.get_mut(&id).map(|doc| {
            doc.download_count += 1;
            doc.file_url.clone()
        }))
    }

    async fn create_knowledge_component(
        &self,
        component: KnowledgeComponent,
    ) -> BackendResult<KnowledgeComponent> {
        let mut store = self.store.write().await;
        store.components.insert(component.document, component.clone());
        Ok(component)
    }

    async fn knowledge_component(&self, document: Uuid) -> BackendResult<Option<KnowledgeComponent>> {
        Ok(self.store.read().await.components.get(&document).cloned())
    }

    async fn project_by_id(&self, id: Uuid) -> BackendResult<Option<Project>> {
        Ok(self.store.read().await.projects.get(&id).cloned())
    }

    async fn create_workspace(&self, workspace: NewWorkspace) -> BackendResult<Workspace> {
        let now = Utc::now();
        let ws = Workspace {
            id: Uuid::new_v4(),
            name: workspace.name,
            description: workspace.description,
            workspace_type: workspace.workspace_type,
            project: workspace.project,
            created_by: workspace.created_by,
            is_private: workspace.is_private,
            tags: workspace.tags,
            created_at: now,
            updated_at: now,
        };
        self.store.write().await.workspaces.insert(ws.id, ws.clone());
        Ok(ws)
    }

    async fn workspace_by_id(&self, id: Uuid) -> BackendResult<Option<Workspace>> {
        Ok(self.store.read().await.workspaces.get(&id).cloned())
    }

    async fn add_workspace_member(&self, membership: Membership) -> BackendResult<Membership> {
        let mut store = self.store.write().await;
        if store
            .memberships
            .iter()
            .any(|m| m.workspace == membership.workspace && m.person == membership.person)
        {
            return Err(BackendError::Conflict(format!(
                "person {} already belongs to workspace {}",
                membership.person, membership.workspace
            )));
        }
        store.memberships.push(membership.clone());
        Ok(membership)
    }

    async fn workspace_membership(
        &self,
        workspace: Uuid,
        person: UserId,
    ) -> BackendResult<Option<Membership>> {
        let store = self.store.read().await;
        Ok(store
            .memberships
            .iter()
            .find(|m| m.workspace == workspace && m.person == person)
            .cloned())
    }

    async fn workspace_members(&self, workspace: Uuid) -> BackendResult<Vec<WorkspaceMember>> {
        let store = self.store.read().await;
        Ok(store
            .memberships
            .iter()
            .filter(|m| m.workspace == workspace)
            .filter_map(|m| {
                store.users.get(&m.person).map(|person| WorkspaceMember {
                    person: person.clone(),
                    membership_role: m.role,
                })
            })
            .collect())
    }

    async fn workspace_documents(&self, workspace: Uuid) -> BackendResult<Vec<Document>> {
        let store = self.store.read().await;
        Ok(store.workspace_docs(workspace).into_iter().cloned().collect())
    }

    async fn add_document_to_workspace(&self, workspace: Uuid, document: Uuid) -> BackendResult<()> {
        let mut store = self.store.write().await;
        if !store.workspace_documents.contains(&(workspace, document)) {
            store.workspace_documents.push((workspace, document));
        }
        Ok(())
    }

    async fn record_workspace_activity(&self, activity: WorkspaceActivity) -> BackendResult<()> {
        self.store.write().await.activities.push(activity);
        Ok(())
    }

    async fn recent_workspace_documents(
        &self,
        workspace: Uuid,
        limit: usize,
    ) -> BackendResult<Vec<Document>> {
        let store = self.store.read().await;
        let mut docs = store.workspace_docs(workspace);
        docs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(docs.into_iter().take(limit).cloned().collect())
    }

    async fn recent_workspace_comments(
        &self,
        workspace: Uuid,
        limit: usize,
    ) -> BackendResult<Vec<Comment>> {
        let store = self.store.read().await;
        let mut comments: Vec<&Comment> = store
            .comments
            .iter()
            .filter(|c| c.workspace == workspace)
            .collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(comments.into_iter().take(limit).cloned().collect())
    }

    async fn activity_count(
        &self,
        workspace: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BackendResult<u64> {
        let store = self.store.read().await;
        Ok(store
            .activities
            .iter()
            .filter(|a| a.workspace == workspace && a.created_at >= start && a.created_at <= end)
            .count() as u64)
    }

    async fn dashboard_stats(&self, timeframe: Timeframe) -> BackendResult<DashboardStats> {
        let store = self.store.read().await;
        let end = Utc::now();
        let span = timeframe.duration();
        let start = end - span;

        let current = store.created_between(start, end).count() as u64;
        let previous = store
            .documents
            .values()
            .filter(|d| d.created_at >= start - span && d.created_at < start)
            .count() as u64;
        let growth = if previous > 0 {
            (current as f64 - previous as f64) / previous as f64 * 100.0
        } else {
            0.0
        };

        let week_ago = end - Duration::days(7);
        let active_users = store.users.values().filter(|u| u.last_activity >= week_ago).count() as u64;
        let avg_quality = mean(store.documents.values().filter_map(|d| d.quality_score));

        let mut activity_trend = Vec::new();
        let mut day = start;
        while day <= end {
            let next = day + Duration::days(1);
            activity_trend.push(TrendPoint {
                date: day.date_naive().to_string(),
                documents: store.created_between(day, next).count() as u64,
                users: store
                    .users
                    .values()
                    .filter(|u| u.last_activity >= day && u.last_activity <= next)
                    .count() as u64,
                quality: mean(store.created_between(day, next).filter_map(|d| d.quality_score)),
            });
            day = next;
        }

        let mut types: IndexMap<DocumentType, u64> = IndexMap::new();
        for doc in store.documents.values() {
            *types.entry(doc.document_type).or_insert(0) += 1;
        }
        let mut document_types: Vec<TypeCount> = types
            .into_iter()
            .map(|(document_type, count)| TypeCount { document_type, count })
            .collect();
        document_types.sort_by(|a, b| b.count.cmp(&a.count));

        Ok(DashboardStats {
            total_documents: store.documents.len() as u64,
            document_growth: round_to(growth, 2),
            active_users,
            avg_quality_score: round_to(avg_quality, 1),
            active_workspaces: store.workspaces.len() as u64,
            activity_trend,
            document_types,
            timeframe: timeframe.as_str().to_string(),
            period: Period { start, end },
        })
    }

    async fn network_totals(&self) -> BackendResult<NetworkTotals> {
        let store = self.store.read().await;
        Ok(NetworkTotals {
            documents: store.documents.len() as u64,
            users: store.users.len() as u64,
            published_documents: store
                .documents
                .values()
                .filter(|d| d.status == DocumentStatus::Published)
                .count() as u64,
            total_views: store.documents.values().map(|d| d.view_count).sum(),
            learning_minutes: store.modules.iter().map(|m| m.total_minutes()).sum(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::demo::{
        AI_FUNDAMENTALS_ID, DEMO_EMAIL, DEMO_USER_ID, PUBLIC_WORKSPACE_ID, TEST_USER_ID,
        WEB_PRACTICES_ID,
    };
    use crate::backend::SearchFilters;
    use crate::models::{MemberRole, Role};

    fn backend() -> MemoryBackend {
        MemoryBackend::with_demo_data().unwrap()
    }

    #[tokio::test]
    async fn test_user_lookup_is_case_insensitive() {
        let b = backend();
        let user = b.user_by_email("DEMO@velion.app").await.unwrap().unwrap();
        assert_eq!(user.id, DEMO_USER_ID);
        assert!(b.user_by_email("nobody@velion.app").await.unwrap().is_none());
        assert!(b.user_by_id(99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_user_assigns_next_id() {
        let b = backend();
        let new = NewPerson {
            email: "new@velion.app".into(),
            password: "hash".into(),
            first_name: "New".into(),
            last_name: "Person".into(),
            employee_id: "EMP100".into(),
            role: Role::User,
            is_active: true,
        };
        let created = b.create_user(new.clone()).await.unwrap();
        assert_eq!(created.id, 3);
        assert!(matches!(b.create_user(new).await, Err(BackendError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_search_terms_and_filters() {
        let b = backend();

        let params = SearchParams::new("knowledge graphs");
        let hits = b.search_documents(&params).await.unwrap();
        assert_eq!(hits.total, 1);
        assert_eq!(hits.documents[0].title, "Knowledge Graph Construction");

        let mut params = SearchParams::new("");
        assert_eq!(b.search_documents(&params).await.unwrap().total, 3);
        params.filters = SearchFilters {
            document_type: Some(DocumentType::Research),
            ..Default::default()
        };
        assert_eq!(b.search_documents(&params).await.unwrap().total, 2);
        params.filters = SearchFilters {
            status: Some(DocumentStatus::Draft),
            ..Default::default()
        };
        assert_eq!(b.search_documents(&params).await.unwrap().total, 0);
        params.filters = SearchFilters {
            tag: Some("NEO4J".into()),
            ..Default::default()
        };
        assert_eq!(b.search_documents(&params).await.unwrap().total, 1);
    }

    #[tokio::test]
    async fn test_search_pagination_newest_first() {
        let b = backend();
        let mut params = SearchParams::new("");
        params.limit = 2;
        let first = b.search_documents(&params).await.unwrap();
        assert_eq!(first.documents.len(), 2);
        assert_eq!(first.total, 3);
        assert_eq!(first.documents[0].id, AI_FUNDAMENTALS_ID);
        params.page = 2;
        let second = b.search_documents(&params).await.unwrap();
        assert_eq!(second.documents.len(), 1);
        assert_eq!(second.total, 3);
        assert_eq!(second.documents[0].title, "Knowledge Graph Construction");
    }

    #[tokio::test]
    async fn test_review_moves_document_through_lifecycle() {
        let b = backend();
        let review = |action| DocumentReview {
            validator: DEMO_USER_ID,
            action,
            feedback: "checked".into(),
        };

        let doc = b
            .validate_document(AI_FUNDAMENTALS_ID, &review(ReviewAction::RequestChanges))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc.status, DocumentStatus::Draft);
        assert_eq!(b.search_documents(&SearchParams::new("neural")).await.unwrap().total, 0);

        let doc = b
            .validate_document(AI_FUNDAMENTALS_ID, &review(ReviewAction::Approve))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc.status, DocumentStatus::Published);
        let component = b.knowledge_component(AI_FUNDAMENTALS_ID).await.unwrap().unwrap();
        assert_eq!(component.validation_status, ValidationStatus::Validated);

        let history = b.validation_history(AI_FUNDAMENTALS_ID).await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].previous_status, DocumentStatus::Published);
        assert_eq!(history[0].new_status, DocumentStatus::Draft);
        assert_eq!(history[1].previous_status, DocumentStatus::Draft);
        assert_eq!(history[1].feedback, "checked");

        assert!(b
            .validate_document(Uuid::new_v4(), &review(ReviewAction::Reject))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_pending_validations() {
        let b = backend();
        assert_eq!(b.pending_validations(1, 20).await.unwrap().total, 0);
        b.update_document(
            WEB_PRACTICES_ID,
            &DocumentUpdate {
                status: Some(DocumentStatus::UnderReview),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let pending = b.pending_validations(1, 20).await.unwrap();
        assert_eq!(pending.total, 1);
        assert_eq!(pending.documents[0].id, WEB_PRACTICES_ID);
    }

    #[tokio::test]
    async fn test_view_and_download_counters() {
        let b = backend();
        let before = b.document_by_id(AI_FUNDAMENTALS_ID).await.unwrap().unwrap();
        assert!(b.record_view(AI_FUNDAMENTALS_ID).await.unwrap());
        let url = b.record_download(AI_FUNDAMENTALS_ID).await.unwrap().unwrap();
        assert_eq!(url, before.file_url);
        let after = b.document_by_id(AI_FUNDAMENTALS_ID).await.unwrap().unwrap();
        assert_eq!(after.view_count, before.view_count + 1);
        assert_eq!(after.download_count, before.download_count + 1);
        assert!(!b.record_view(Uuid::new_v4()).await.unwrap());
        assert!(b.record_download(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_membership_conflicts() {
        let b = backend();
        let existing = b
            .workspace_membership(PUBLIC_WORKSPACE_ID, TEST_USER_ID)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(existing.role, MemberRole::Member);
        let again = Membership {
            workspace: PUBLIC_WORKSPACE_ID,
            person: TEST_USER_ID,
            role: MemberRole::Admin,
            joined_at: Utc::now(),
        };
        assert!(matches!(
            b.add_workspace_member(again).await,
            Err(BackendError::Conflict(_))
        ));
        let members = b.workspace_members(PUBLIC_WORKSPACE_ID).await.unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].person.email, DEMO_EMAIL);
    }

    #[tokio::test]
    async fn test_update_missing_document() {
        let b = backend();
        let err = b
            .update_document(Uuid::new_v4(), &DocumentUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_dashboard_stats() {
        let b = backend();
        let stats = b.dashboard_stats(Timeframe::Week).await.unwrap();
        assert_eq!(stats.total_documents, 3);
        assert_eq!(stats.active_users, 1);
        // (92 + 84 + 88) / 3
        assert_eq!(stats.avg_quality_score, 88.0);
        assert_eq!(stats.active_workspaces, 2);
        assert_eq!(stats.document_growth, 0.0);
        assert_eq!(stats.document_types[0].document_type, DocumentType::Research);
        assert_eq!(stats.document_types[0].count, 2);
        assert_eq!(stats.timeframe, "7days");
        let trend_docs: u64 = stats.activity_trend.iter().map(|p| p.documents).sum();
        assert!(trend_docs >= 3);
    }

    #[tokio::test]
    async fn test_network_totals() {
        let totals = backend().network_totals().await.unwrap();
        assert_eq!(totals.documents, 3);
        assert_eq!(totals.users, 2);
        assert_eq!(totals.published_documents, 3);
        assert_eq!(totals.total_views, 48 + 21 + 9);
        assert_eq!(totals.learning_minutes, 40);
    }
}
