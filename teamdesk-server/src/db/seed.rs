//! Demo fixture data
//!
//! Mirrors the dashboard's sample workspace: eight team members, a handful
//! of leads with their activity history, and a pipeline of deals, several
//! of which close relative to today so the charts have something to show.
//! Fixture ids like `lead-1` are mapped to the generated row ids; ids that
//! name no fixture (`lead-x`) are stored as-is, the way the sample data
//! leaves them dangling.

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use teamdesk_core::models::{ActivityKind, DealStage, LeadStatus, TaskPriority, TaskStatus};

use super::repos::{DbError, Person};

/// Tables cleared by a forced reseed, children first
const TABLES: &str = "activities, tasks, deals, leads, contacts, products, bookmarks, users";

/// Point in time, either relative to now or fixed
#[derive(Debug, Clone, Copy)]
enum When {
    DaysAgo(i64),
    On(i32, u32, u32),
    At(i32, u32, u32, u32),
}

impl When {
    fn at(self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            When::DaysAgo(days) => now - Duration::days(days),
            When::On(y, m, d) => Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).single().unwrap_or(now),
            When::At(y, m, d, h) => Utc.with_ymd_and_hms(y, m, d, h, 0, 0).single().unwrap_or(now),
        }
    }

    fn date(self, now: DateTime<Utc>) -> NaiveDate {
        self.at(now).date_naive()
    }
}

struct UserFixture {
    name: &'static str,
    email: &'static str,
}

const USERS: &[UserFixture] = &[
    UserFixture { name: "Alex Johnson", email: "alex@example.com" },
    UserFixture { name: "Maria Garcia", email: "maria@example.com" },
    UserFixture { name: "James Smith", email: "james@example.com" },
    UserFixture { name: "Alfie Turner", email: "alfie@example.com" },
    UserFixture { name: "Bella Poarch", email: "bella@example.com" },
    UserFixture { name: "Cinderella", email: "cindy@example.com" },
    UserFixture { name: "David Johnson", email: "david@example.com" },
    UserFixture { name: "Peter Parker", email: "peter@example.com" },
];

/// Team member by position, as owner/author/assignee
fn member(index: usize) -> Person {
    let user = &USERS[index];
    Person::new(user.name, format!("https://i.pravatar.cc/150?u=user-{}", index + 1))
}

struct ContactFixture {
    key: &'static str,
    name: &'static str,
    email: &'static str,
    phone: &'static str,
    company: &'static str,
    tags: &'static [&'static str],
}

const CONTACTS: &[ContactFixture] = &[
    ContactFixture {
        key: "contact-1",
        name: "John Doe",
        email: "john.doe@brighttech.com",
        phone: "123-456-7890",
        company: "BrightTech",
        tags: &["Client", "VIP"],
    },
    ContactFixture {
        key: "contact-2",
        name: "Jane Miller",
        email: "jane.miller@solutioncorp.com",
        phone: "234-567-8901",
        company: "SolutionCorp",
        tags: &["Prospect"],
    },
    ContactFixture {
        key: "contact-3",
        name: "Sam Wilson",
        email: "sam.wilson@webwizards.io",
        phone: "345-678-9012",
        company: "WebWizards",
        tags: &["Vendor"],
    },
];

struct ActivityFixture {
    kind: ActivityKind,
    content: &'static str,
    when: When,
    author: usize,
}

struct LeadFixture {
    key: &'static str,
    name: &'static str,
    company: &'static str,
    email: &'static str,
    phone: &'static str,
    status: LeadStatus,
    source: &'static str,
    country: &'static str,
    owner: usize,
    created: When,
    activities: &'static [ActivityFixture],
}

const LEADS: &[LeadFixture] = &[
    LeadFixture {
        key: "lead-1",
        name: "Sarah Lee",
        company: "Innovate LLC",
        email: "sarah.lee@innovatellc.com",
        phone: "456-789-0123",
        status: LeadStatus::Proposal,
        source: "Social Media",
        country: "India",
        owner: 0,
        created: When::DaysAgo(7),
        activities: &[
            ActivityFixture {
                kind: ActivityKind::Meeting,
                content: "Initial discovery call",
                when: When::DaysAgo(7),
                author: 0,
            },
            ActivityFixture {
                kind: ActivityKind::Email,
                content: "Sent follow-up email with proposal",
                when: When::DaysAgo(3),
                author: 0,
            },
        ],
    },
    LeadFixture {
        key: "lead-2",
        name: "Michael Chen",
        company: "Data Dynamics",
        email: "michael.chen@datadynamics.com",
        phone: "567-890-1234",
        status: LeadStatus::Negotiation,
        source: "Referral",
        country: "United States",
        owner: 1,
        created: When::At(2023, 10, 12, 11),
        activities: &[ActivityFixture {
            kind: ActivityKind::Call,
            content: "Discussed pricing and terms",
            when: When::At(2023, 10, 20, 16),
            author: 1,
        }],
    },
    LeadFixture {
        key: "lead-3",
        name: "Emily Carter",
        company: "Creative Solutions",
        email: "emily.carter@creativesolutions.com",
        phone: "678-901-2345",
        status: LeadStatus::New,
        source: "Direct Search",
        country: "China",
        owner: 0,
        created: When::DaysAgo(0),
        activities: &[],
    },
    LeadFixture {
        key: "lead-4",
        name: "David Rodriguez",
        company: "Quantum Leap Inc.",
        email: "david.r@quantumleap.com",
        phone: "789-012-3456",
        status: LeadStatus::Contacted,
        source: "Social Media",
        country: "Indonesia",
        owner: 2,
        created: When::DaysAgo(1),
        activities: &[],
    },
    LeadFixture {
        key: "lead-5",
        name: "Jessica Wong",
        company: "NextGen AI",
        email: "jess.wong@nextgen.ai",
        phone: "012-345-6789",
        status: LeadStatus::Won,
        source: "Others",
        country: "Russia",
        owner: 1,
        created: When::DaysAgo(7),
        activities: &[],
    },
    LeadFixture {
        key: "lead-6",
        name: "Chris Evans",
        company: "Star Tech",
        email: "chris.e@startech.com",
        phone: "111-222-3333",
        status: LeadStatus::New,
        source: "Direct Search",
        country: "Bangladesh",
        owner: 2,
        created: When::DaysAgo(0),
        activities: &[],
    },
];

struct DealFixture {
    key: &'static str,
    title: &'static str,
    value: f64,
    stage: DealStage,
    lead: &'static str,
    owner: usize,
    close: When,
    created: When,
}

const DEALS: &[DealFixture] = &[
    DealFixture {
        key: "deal-1",
        title: "Website Redesign Project",
        value: 15000.0,
        stage: DealStage::Proposal,
        lead: "lead-1",
        owner: 0,
        close: When::On(2023, 11, 30),
        created: When::On(2023, 11, 1),
    },
    DealFixture {
        key: "deal-2",
        title: "Data Analytics Platform",
        value: 25000.0,
        stage: DealStage::Negotiation,
        lead: "lead-2",
        owner: 1,
        close: When::On(2023, 11, 15),
        created: When::On(2023, 10, 20),
    },
    DealFixture {
        key: "deal-3",
        title: "Marketing Campaign",
        value: 8000.0,
        stage: DealStage::Qualification,
        lead: "lead-4",
        owner: 2,
        close: When::On(2023, 12, 10),
        created: When::On(2023, 11, 5),
    },
    DealFixture {
        key: "deal-4",
        title: "Cloud Migration Service",
        value: 35000.0,
        stage: DealStage::ClosedWon,
        lead: "lead-x",
        owner: 0,
        close: When::DaysAgo(3),
        created: When::On(2023, 10, 15),
    },
    DealFixture {
        key: "deal-5",
        title: "Mobile App Development",
        value: 45000.0,
        stage: DealStage::NeedsAnalysis,
        lead: "lead-y",
        owner: 1,
        close: When::On(2023, 12, 28),
        created: When::On(2023, 11, 10),
    },
    DealFixture {
        key: "deal-6",
        title: "CRM Setup",
        value: 39.92,
        stage: DealStage::ClosedWon,
        lead: "lead-z1",
        owner: 3,
        close: When::DaysAgo(0),
        created: When::DaysAgo(7),
    },
    DealFixture {
        key: "deal-7",
        title: "Social Media Mgmt",
        value: 199.99,
        stage: DealStage::ClosedWon,
        lead: "lead-z2",
        owner: 4,
        close: When::DaysAgo(0),
        created: When::DaysAgo(7),
    },
    DealFixture {
        key: "deal-8",
        title: "New Landing Page",
        value: 30.0,
        stage: DealStage::ClosedWon,
        lead: "lead-z3",
        owner: 5,
        close: When::DaysAgo(1),
        created: When::DaysAgo(7),
    },
    DealFixture {
        key: "deal-9",
        title: "SEO Consulting",
        value: 49.99,
        stage: DealStage::ClosedWon,
        lead: "lead-z4",
        owner: 6,
        close: When::DaysAgo(1),
        created: When::DaysAgo(7),
    },
    DealFixture {
        key: "deal-10",
        title: "Blog Content",
        value: 49.99,
        stage: DealStage::ClosedWon,
        lead: "lead-z5",
        owner: 7,
        close: When::DaysAgo(3),
        created: When::DaysAgo(7),
    },
];

struct TaskFixture {
    title: &'static str,
    priority: TaskPriority,
    status: TaskStatus,
    due: When,
    assignee: usize,
    /// `(type, fixture key, display name)`
    related: Option<(&'static str, &'static str, &'static str)>,
}

const TASKS: &[TaskFixture] = &[
    TaskFixture {
        title: "Follow up with Sarah Lee",
        priority: TaskPriority::High,
        status: TaskStatus::ToDo,
        due: When::On(2023, 10, 28),
        assignee: 0,
        related: Some(("lead", "lead-1", "Sarah Lee")),
    },
    TaskFixture {
        title: "Prepare contract for Data Dynamics",
        priority: TaskPriority::High,
        status: TaskStatus::InProgress,
        due: When::On(2023, 10, 29),
        assignee: 1,
        related: Some(("deal", "deal-2", "Data Analytics Platform")),
    },
    TaskFixture {
        title: "Schedule demo with David Rodriguez",
        priority: TaskPriority::Medium,
        status: TaskStatus::ToDo,
        due: When::On(2023, 11, 2),
        assignee: 2,
        related: Some(("lead", "lead-4", "David Rodriguez")),
    },
    TaskFixture {
        title: "Update quarterly report",
        priority: TaskPriority::Low,
        status: TaskStatus::Done,
        due: When::On(2023, 10, 25),
        assignee: 0,
        related: None,
    },
];

/// `(name, price, category, created)`
const PRODUCTS: &[(&str, f64, &str, When)] = &[
    ("Standard Website Package", 15000.0, "Web Development", When::On(2023, 1, 15)),
    ("Analytics Dashboard License", 5000.0, "Software", When::On(2023, 2, 20)),
    ("Monthly Marketing Retainer", 8000.0, "Marketing", When::On(2023, 3, 10)),
    ("Cloud Setup & Migration", 35000.0, "Services", When::On(2023, 4, 5)),
];

/// `(title, subtitle, type)`
const BOOKMARKS: &[(&str, &str, &str)] = &[
    ("Sarah Lee - Innovate LLC", "Status: Proposal", "lead"),
    ("Website Redesign Project", "Value: $15,000", "deal"),
    ("Q4 Sales Performance", "Generated Oct 28, 2023", "report"),
    ("Michael Chen - Data Dynamics", "Status: Negotiation", "lead"),
];

/// Rows written per table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub skipped: bool,
    pub users: usize,
    pub contacts: usize,
    pub leads: usize,
    pub activities: usize,
    pub deals: usize,
    pub tasks: usize,
    pub products: usize,
    pub bookmarks: usize,
}

impl SeedReport {
    pub fn total(&self) -> usize {
        self.users
            + self.contacts
            + self.leads
            + self.activities
            + self.deals
            + self.tasks
            + self.products
            + self.bookmarks
    }
}

/// Fixture keys mapped to generated ids
#[derive(Default)]
struct KeyMap(HashMap<&'static str, i64>);

impl KeyMap {
    /// Generated id for a known key, the key itself otherwise.
    fn resolve(&self, key: &str) -> String {
        self.0
            .get(key)
            .map(|id| id.to_string())
            .unwrap_or_else(|| key.to_owned())
    }
}

/// Load the demo workspace.
///
/// Skips when the team table already has rows unless `force` is set, in
/// which case every table is truncated first. Runs in one transaction.
pub async fn seed(pool: &PgPool, force: bool) -> Result<SeedReport, DbError> {
    let mut tx = pool.begin().await?;

    if force {
        sqlx::query(&format!("TRUNCATE {} RESTART IDENTITY", TABLES))
            .execute(&mut *tx)
            .await?;
        tracing::info!("Cleared existing data");
    } else {
        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&mut *tx)
            .await?;
        if existing > 0 {
            tracing::info!(users = existing, "Database already seeded, skipping");
            return Ok(SeedReport {
                skipped: true,
                ..SeedReport::default()
            });
        }
    }

    let now = Utc::now();
    let mut report = SeedReport::default();
    let mut keys = KeyMap::default();

    for (index, user) in USERS.iter().enumerate() {
        let person = member(index);
        sqlx::query("INSERT INTO users (name, email, avatar) VALUES ($1, $2, $3)")
            .bind(user.name)
            .bind(user.email)
            .bind(&person.avatar)
            .execute(&mut *tx)
            .await?;
        report.users += 1;
    }

    for contact in CONTACTS {
        sqlx::query(
            r#"
            INSERT INTO contacts (name, email, phone, company, tags, avatar)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(contact.name)
        .bind(contact.email)
        .bind(contact.phone)
        .bind(contact.company)
        .bind(contact.tags)
        .bind(format!("https://i.pravatar.cc/150?u={}", contact.key))
        .execute(&mut *tx)
        .await?;
        report.contacts += 1;
    }

    for lead in LEADS {
        let id = insert_lead(&mut tx, lead, now).await?;
        keys.0.insert(lead.key, id);
        report.leads += 1;

        for activity in lead.activities {
            let author = member(activity.author);
            sqlx::query(
                r#"
                INSERT INTO activities (type, content, date, lead_id, author_name, author_avatar)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(activity.kind.as_str())
            .bind(activity.content)
            .bind(activity.when.at(now))
            .bind(id)
            .bind(&author.name)
            .bind(&author.avatar)
            .execute(&mut *tx)
            .await?;
            report.activities += 1;
        }
    }

    for deal in DEALS {
        let owner = member(deal.owner);
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO deals (title, value, stage, lead_id, owner_name, owner_avatar, close_date, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(deal.title)
        .bind(deal.value)
        .bind(deal.stage.as_str())
        .bind(keys.resolve(deal.lead))
        .bind(&owner.name)
        .bind(&owner.avatar)
        .bind(deal.close.date(now))
        .bind(deal.created.at(now))
        .fetch_one(&mut *tx)
        .await?;
        keys.0.insert(deal.key, id);
        report.deals += 1;
    }

    for task in TASKS {
        let assignee = member(task.assignee);
        let (related_type, related_id, related_name) = match task.related {
            Some((kind, key, name)) => (Some(kind), Some(keys.resolve(key)), Some(name)),
            None => (None, None, None),
        };

        sqlx::query(
            r#"
            INSERT INTO tasks (title, priority, status, due_date, assignee_name, assignee_avatar,
                               related_type, related_id, related_name)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(task.title)
        .bind(task.priority.as_str())
        .bind(task.status.as_str())
        .bind(task.due.date(now))
        .bind(&assignee.name)
        .bind(&assignee.avatar)
        .bind(related_type)
        .bind(related_id)
        .bind(related_name)
        .execute(&mut *tx)
        .await?;
        report.tasks += 1;
    }

    for &(name, price, category, created) in PRODUCTS {
        sqlx::query(
            "INSERT INTO products (name, price, category, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(name)
        .bind(price)
        .bind(category)
        .bind(created.at(now))
        .execute(&mut *tx)
        .await?;
        report.products += 1;
    }

    for &(title, subtitle, kind) in BOOKMARKS {
        sqlx::query("INSERT INTO bookmarks (title, subtitle, type) VALUES ($1, $2, $3)")
            .bind(title)
            .bind(subtitle)
            .bind(kind)
            .execute(&mut *tx)
            .await?;
        report.bookmarks += 1;
    }

    tx.commit().await?;

    tracing::info!(rows = report.total(), "Seed complete");
    Ok(report)
}

async fn insert_lead(
    tx: &mut Transaction<'_, Postgres>,
    lead: &LeadFixture,
    now: DateTime<Utc>,
) -> Result<i64, DbError> {
    let owner = member(lead.owner);
    let id = sqlx::query_scalar(
        r#"
        INSERT INTO leads (name, company, email, phone, status, source, country, avatar,
                           owner_name, owner_avatar, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING id
        "#,
    )
    .bind(lead.name)
    .bind(lead.company)
    .bind(lead.email)
    .bind(lead.phone)
    .bind(lead.status.as_str())
    .bind(lead.source)
    .bind(lead.country)
    .bind(format!("https://i.pravatar.cc/150?u={}", lead.key))
    .bind(&owner.name)
    .bind(&owner.avatar)
    .bind(lead.created.at(now))
    .fetch_one(&mut **tx)
    .await?;

    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_counts() {
        assert_eq!(USERS.len(), 8);
        assert_eq!(CONTACTS.len(), 3);
        assert_eq!(LEADS.len(), 6);
        assert_eq!(LEADS.iter().map(|l| l.activities.len()).sum::<usize>(), 3);
        assert_eq!(DEALS.len(), 10);
        assert_eq!(TASKS.len(), 4);
        assert_eq!(PRODUCTS.len(), 4);
        assert_eq!(BOOKMARKS.len(), 4);
    }

    #[test]
    fn members_use_positional_avatars() {
        assert_eq!(
            member(0),
            Person::new("Alex Johnson", "https://i.pravatar.cc/150?u=user-1")
        );
        assert_eq!(member(7).avatar, "https://i.pravatar.cc/150?u=user-8");
    }

    #[test]
    fn owner_indexes_in_range() {
        assert!(LEADS.iter().all(|l| l.owner < USERS.len()));
        assert!(DEALS.iter().all(|d| d.owner < USERS.len()));
        assert!(TASKS.iter().all(|t| t.assignee < USERS.len()));
        assert!(LEADS
            .iter()
            .flat_map(|l| l.activities)
            .all(|a| a.author < USERS.len()));
    }

    #[test]
    fn fixed_dates_are_valid() {
        let now = Utc::now();
        let check = |when: When| match when {
            When::DaysAgo(_) => {}
            other => assert_ne!(other.at(now), now, "{:?} is not a real date", other),
        };

        for lead in LEADS {
            check(lead.created);
            lead.activities.iter().for_each(|a| check(a.when));
        }
        for deal in DEALS {
            check(deal.close);
            check(deal.created);
        }
        TASKS.iter().for_each(|t| check(t.due));
        PRODUCTS.iter().for_each(|p| check(p.3));
    }

    #[test]
    fn relative_dates() {
        let now = Utc.with_ymd_and_hms(2023, 12, 8, 9, 30, 0).unwrap();
        assert_eq!(When::DaysAgo(0).date(now), NaiveDate::from_ymd_opt(2023, 12, 8).unwrap());
        assert_eq!(When::DaysAgo(3).date(now), NaiveDate::from_ymd_opt(2023, 12, 5).unwrap());
        assert_eq!(
            When::At(2023, 10, 20, 16).at(now).to_rfc3339(),
            "2023-10-20T16:00:00+00:00"
        );
    }

    #[test]
    fn dangling_keys_pass_through() {
        let mut keys = KeyMap::default();
        keys.0.insert("lead-1", 41);
        assert_eq!(keys.resolve("lead-1"), "41");
        assert_eq!(keys.resolve("lead-x"), "lead-x");
    }

    #[test]
    fn vocabulary_labels_are_valid() {
        for task in TASKS {
            if let Some((kind, _, _)) = task.related {
                assert!(teamdesk_core::models::RelatedKind::parse(kind).is_ok());
            }
        }
        for (_, _, kind) in BOOKMARKS {
            assert!(teamdesk_core::models::BookmarkKind::parse(kind).is_ok());
        }
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn seed_then_skip() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL");
        let pool = PgPool::connect(&url).await.unwrap();
        crate::db::migrations::run(&pool).await.unwrap();

        let first = seed(&pool, true).await.unwrap();
        assert!(!first.skipped);
        assert_eq!(first.deals, 10);

        let second = seed(&pool, false).await.unwrap();
        assert!(second.skipped);
        assert_eq!(second.total(), 0);
    }
}
