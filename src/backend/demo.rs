//! Demo dataset for the in-memory backend
//!
//! Two sign-in accounts (`demo@velion.app` / `Demo@123456` and
//! `test@velion.app` / `Test@123456`), three published documents, one
//! project, a public and a private workspace, one comment and two
//! microlearning modules. Timestamps are relative to the moment of seeding.

use crate::auth::{hash_password, AuthResult};
use crate::models::{
    Comment, Difficulty, Document, DocumentStatus, DocumentType, ExpertiseLevel, KnowledgeComponent,
    LearningFormat, MemberRole, Membership, MicrolearningModule, Person, Project, ProjectStatus,
    Role, ValidationStatus, Workspace, WorkspaceActivity, WorkspaceType,
};
use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Map, Value};
use std::sync::OnceLock;
use uuid::Uuid;

pub const DEMO_EMAIL: &str = "demo@velion.app";
pub const DEMO_PASSWORD: &str = "Demo@123456";
pub const TEST_EMAIL: &str = "test@velion.app";
pub const TEST_PASSWORD: &str = "Test@123456";

pub const DEMO_USER_ID: i64 = 1;
pub const TEST_USER_ID: i64 = 2;

pub const AI_FUNDAMENTALS_ID: Uuid = Uuid::from_u128(0x6f1c_2a10_0001_4000_8000_0000_0000_0001);
pub const WEB_PRACTICES_ID: Uuid = Uuid::from_u128(0x6f1c_2a10_0001_4000_8000_0000_0000_0002);
pub const GRAPH_CONSTRUCTION_ID: Uuid = Uuid::from_u128(0x6f1c_2a10_0001_4000_8000_0000_0000_0003);
pub const PROJECT_ID: Uuid = Uuid::from_u128(0x6f1c_2a10_0002_4000_8000_0000_0000_0001);
pub const PUBLIC_WORKSPACE_ID: Uuid = Uuid::from_u128(0x6f1c_2a10_0003_4000_8000_0000_0000_0001);
pub const PRIVATE_WORKSPACE_ID: Uuid = Uuid::from_u128(0x6f1c_2a10_0003_4000_8000_0000_0000_0002);

/// Records loaded into a [`super::MemoryBackend`]
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub users: Vec<Person>,
    pub documents: Vec<Document>,
    pub components: Vec<KnowledgeComponent>,
    pub projects: Vec<Project>,
    pub workspaces: Vec<Workspace>,
    pub memberships: Vec<Membership>,
    /// (workspace, document) links
    pub workspace_documents: Vec<(Uuid, Uuid)>,
    pub comments: Vec<Comment>,
    pub activities: Vec<WorkspaceActivity>,
    pub modules: Vec<MicrolearningModule>,
}

/// Argon2 hashes are slow to compute, so the demo ones are computed once
fn demo_hashes() -> AuthResult<&'static [String; 2]> {
    static HASHES: OnceLock<[String; 2]> = OnceLock::new();
    if let Some(hashes) = HASHES.get() {
        return Ok(hashes);
    }
    let computed = [hash_password(DEMO_PASSWORD)?, hash_password(TEST_PASSWORD)?];
    Ok(HASHES.get_or_init(|| computed))
}

fn person(
    id: i64,
    email: &str,
    password: &str,
    name: (&str, &str),
    role: Role,
    now: DateTime<Utc>,
) -> Person {
    Person {
        id,
        email: email.to_string(),
        password: Some(password.to_string()),
        first_name: name.0.to_string(),
        last_name: name.1.to_string(),
        employee_id: format!("EMP{:03}", id),
        role,
        department: String::new(),
        region: String::new(),
        skills: Vec::new(),
        expertise_level: ExpertiseLevel::Intermediate,
        profile_completion: 0,
        is_active: true,
        last_activity: now,
        created_at: now - Duration::days(30),
        updated_at: now,
    }
}

#[allow(clippy::too_many_arguments)]
fn document(
    id: Uuid,
    title: &str,
    description: &str,
    document_type: DocumentType,
    quality: f64,
    tags: &[&str],
    views: u64,
    file_size: u64,
    created_at: DateTime<Utc>,
) -> Document {
    let mut metadata = Map::new();
    metadata.insert(
        "originalFilename".to_string(),
        Value::String(format!("{}.pdf", title.to_lowercase().replace(' ', "_"))),
    );
    metadata.insert("fileType".to_string(), Value::String("application/pdf".to_string()));
    Document {
        id,
        title: title.to_string(),
        description: description.to_string(),
        content_hash: String::new(),
        blockchain_tx_id: None,
        uploader: DEMO_USER_ID,
        status: DocumentStatus::Published,
        document_type,
        quality_score: Some(quality),
        metadata,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        summary: Some(description.to_string()),
        file_url: format!("https://storage.dkn.com/documents/{}", id),
        file_size,
        file_type: "application/pdf".to_string(),
        version: 1,
        view_count: views,
        download_count: views / 4,
        project: Some(PROJECT_ID),
        created_at,
        updated_at: created_at,
        published_at: Some(created_at),
    }
}

/// Build the demo dataset
pub fn dataset() -> AuthResult<Dataset> {
    let [demo_hash, test_hash] = demo_hashes()?;
    let now = Utc::now();

    let mut demo_user = person(
        DEMO_USER_ID,
        DEMO_EMAIL,
        demo_hash,
        ("Demo", "User"),
        Role::KnowledgeChampion,
        now,
    );
    demo_user.department = "Knowledge Management".to_string();
    demo_user.region = "Europe".to_string();
    demo_user.skills = vec!["Knowledge Graphs".to_string(), "Machine Learning".to_string()];
    demo_user.expertise_level = ExpertiseLevel::Senior;
    demo_user.profile_completion = demo_user.compute_profile_completion();

    let mut test_user = person(
        TEST_USER_ID,
        TEST_EMAIL,
        test_hash,
        ("Test", "Consultant"),
        Role::Consultant,
        now - Duration::days(10),
    );
    test_user.department = "Consulting".to_string();

    let mut ai = document(
        AI_FUNDAMENTALS_ID,
        "Artificial Intelligence Fundamentals",
        "Introduction to AI concepts, machine learning, and neural networks",
        DocumentType::Research,
        92.0,
        &["ai", "machine learning", "neural networks"],
        48,
        2_500_000,
        now - Duration::days(1),
    );
    ai.blockchain_tx_id = Some("tx_1768386600000".to_string());
    let web = document(
        WEB_PRACTICES_ID,
        "Web Development Best Practices",
        "Modern web development techniques using React, Node.js, and PostgreSQL",
        DocumentType::Guideline,
        84.0,
        &["react", "node.js", "postgresql"],
        21,
        1_800_000,
        now - Duration::days(2),
    );
    let graph = document(
        GRAPH_CONSTRUCTION_ID,
        "Knowledge Graph Construction",
        "Building and querying knowledge graphs with Neo4j and semantic relationships",
        DocumentType::Research,
        88.0,
        &["knowledge graph", "neo4j"],
        9,
        3_200_000,
        now - Duration::days(3),
    );

    let components = vec![KnowledgeComponent {
        document: AI_FUNDAMENTALS_ID,
        summary: "Core AI concepts with a primer on neural networks".to_string(),
        key_topics: vec!["Artificial Intelligence".to_string(), "Machine Learning".to_string()],
        entities: vec![json!({"name": "Neural Networks", "type": "Technology"})],
        sentiment_score: Some(0.6),
        complexity_score: Some(0.7),
        validation_status: ValidationStatus::Validated,
    }];

    let project = Project {
        id: PROJECT_ID,
        name: "Velion Knowledge Platform".to_string(),
        description: "Rollout of the digital knowledge network".to_string(),
        status: ProjectStatus::Active,
        created_by: DEMO_USER_ID,
        tags: vec!["platform".to_string()],
        created_at: now - Duration::days(30),
    };

    let public_ws = Workspace {
        id: PUBLIC_WORKSPACE_ID,
        name: "AI Research Guild".to_string(),
        description: "Shared notes on applied machine learning".to_string(),
        workspace_type: WorkspaceType::Interest,
        project: Some(PROJECT_ID),
        created_by: DEMO_USER_ID,
        is_private: false,
        tags: vec!["ai".to_string()],
        created_at: now - Duration::days(20),
        updated_at: now - Duration::days(1),
    };
    let private_ws = Workspace {
        id: PRIVATE_WORKSPACE_ID,
        name: "Leadership Circle".to_string(),
        description: "Planning space for knowledge champions".to_string(),
        workspace_type: WorkspaceType::Department,
        project: None,
        created_by: DEMO_USER_ID,
        is_private: true,
        tags: Vec::new(),
        created_at: now - Duration::days(15),
        updated_at: now - Duration::days(15),
    };

    let memberships = vec![
        Membership {
            workspace: PUBLIC_WORKSPACE_ID,
            person: DEMO_USER_ID,
            role: MemberRole::Owner,
            joined_at: public_ws.created_at,
        },
        Membership {
            workspace: PUBLIC_WORKSPACE_ID,
            person: TEST_USER_ID,
            role: MemberRole::Member,
            joined_at: now - Duration::days(5),
        },
        Membership {
            workspace: PRIVATE_WORKSPACE_ID,
            person: DEMO_USER_ID,
            role: MemberRole::Owner,
            joined_at: private_ws.created_at,
        },
    ];

    let comment = Comment {
        id: Uuid::from_u128(0x6f1c_2a10_0004_4000_8000_0000_0000_0001),
        document: AI_FUNDAMENTALS_ID,
        workspace: PUBLIC_WORKSPACE_ID,
        author: test_user.clone(),
        body: "Great primer, the section on neural networks helped a lot.".to_string(),
        created_at: now - Duration::hours(5),
    };

    let activities = vec![WorkspaceActivity {
        workspace: PUBLIC_WORKSPACE_ID,
        user: DEMO_USER_ID,
        activity_type: "DOCUMENT_ADDED".to_string(),
        details: json!({
            "documentId": AI_FUNDAMENTALS_ID,
            "documentTitle": ai.title,
        }),
        created_at: ai.created_at,
    }];

    let modules = vec![
        MicrolearningModule {
            id: Uuid::from_u128(0x6f1c_2a10_0005_4000_8000_0000_0000_0001),
            title: "Machine Learning Basics".to_string(),
            format: LearningFormat::Video,
            difficulty: Difficulty::Beginner,
            duration_minutes: 15,
            completed_by: vec![DEMO_USER_ID, TEST_USER_ID],
        },
        MicrolearningModule {
            id: Uuid::from_u128(0x6f1c_2a10_0005_4000_8000_0000_0000_0002),
            title: "Writing Reusable Proposals".to_string(),
            format: LearningFormat::Article,
            difficulty: Difficulty::Intermediate,
            duration_minutes: 10,
            completed_by: vec![DEMO_USER_ID],
        },
    ];

    Ok(Dataset {
        users: vec![demo_user, test_user],
        documents: vec![ai, web, graph],
        components,
        projects: vec![project],
        workspaces: vec![public_ws, private_ws],
        memberships,
        workspace_documents: vec![
            (PUBLIC_WORKSPACE_ID, AI_FUNDAMENTALS_ID),
            (PUBLIC_WORKSPACE_ID, GRAPH_CONSTRUCTION_ID),
        ],
        comments: vec![comment],
        activities,
        modules,
    })
}
