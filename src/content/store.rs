//! Content Storage
//! Mission: SQLite CRUD for news, sections, activities, and WhatsApp posts

use crate::content::models::{Activity, NewNews, News, Section, WhatsappPost};
use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, Row};
use tracing::info;

/// Default page sections seeded on first start.
const DEFAULT_SECTIONS: [(&str, &str, i64); 8] = [
    ("الصادقون", "home", 1),
    ("التنظيم السياسي", "political", 2),
    ("التنفيذي", "executive", 3),
    ("بناء الدولة", "state-building", 4),
    ("العلاقات", "relations", 5),
    ("أخبار الصادقون", "news", 6),
    ("الأنشطة", "activities", 7),
    ("الاتصال والدعم", "contact", 8),
];

/// Content storage with SQLite backend.
pub struct ContentStore {
    db_path: String,
}

impl ContentStore {
    /// Open the content store and initialize the schema.
    pub fn new(db_path: &str) -> Result<Self> {
        let store = Self {
            db_path: db_path.to_string(),
        };
        store.init_db()?;
        Ok(store)
    }

    fn init_db(&self) -> Result<()> {
        let conn = Connection::open(&self.db_path)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS news (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                image TEXT,
                category TEXT NOT NULL DEFAULT 'general',
                source TEXT NOT NULL DEFAULT 'manual',
                published_date TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS sections (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                slug TEXT UNIQUE NOT NULL,
                content TEXT,
                order_index INTEGER NOT NULL DEFAULT 0,
                is_active INTEGER NOT NULL DEFAULT 1
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS activities (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT,
                image TEXT,
                date TEXT,
                location TEXT,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS whatsapp_posts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                content TEXT,
                image TEXT,
                external_link TEXT,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        self.seed_sections(&conn)?;

        Ok(())
    }

    fn seed_sections(&self, conn: &Connection) -> Result<()> {
        let mut seeded = 0;
        for (name, slug, order) in DEFAULT_SECTIONS {
            seeded += conn
                .execute(
                    "INSERT OR IGNORE INTO sections (name, slug, content, order_index)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![name, slug, format!("محتوى قسم {}", name), order],
                )
                .context("Failed to seed section")?;
        }

        if seeded > 0 {
            info!("📄 Seeded {} default page sections", seeded);
        }

        Ok(())
    }

    fn open(&self) -> Result<Connection> {
        Ok(Connection::open(&self.db_path)?)
    }

    // ===== News =====

    fn news_from_row(row: &Row) -> rusqlite::Result<News> {
        Ok(News {
            id: row.get(0)?,
            title: row.get(1)?,
            content: row.get(2)?,
            image: row.get(3)?,
            category: row.get(4)?,
            source: row.get(5)?,
            published_date: row.get(6)?,
            created_at: row.get(7)?,
        })
    }

    pub fn list_news(&self, category: Option<&str>, limit: i64) -> Result<Vec<News>> {
        let conn = self.open()?;
        let mut stmt = conn.prepare(
            "SELECT id, title, content, image, category, source, published_date, created_at
             FROM news
             WHERE (?1 IS NULL OR category = ?1)
             ORDER BY published_date DESC, id DESC
             LIMIT ?2",
        )?;

        let news = stmt
            .query_map(params![category, limit], Self::news_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(news)
    }

    pub fn get_news(&self, id: i64) -> Result<Option<News>> {
        let conn = self.open()?;
        let mut stmt = conn.prepare(
            "SELECT id, title, content, image, category, source, published_date, created_at
             FROM news WHERE id = ?1",
        )?;

        match stmt.query_row(params![id], Self::news_from_row) {
            Ok(news) => Ok(Some(news)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn insert_news(&self, news: &NewNews) -> Result<i64> {
        let conn = self.open()?;
        let now = Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO news (title, content, image, category, source, published_date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                news.title,
                news.content,
                news.image,
                news.category.as_deref().unwrap_or("general"),
                news.source.as_deref().unwrap_or("manual"),
                news.published_date.as_deref().unwrap_or(&now),
                now,
            ],
        )
        .context("Failed to insert news")?;

        Ok(conn.last_insert_rowid())
    }

    pub fn update_news(
        &self,
        id: i64,
        title: &str,
        content: &str,
        image: Option<&str>,
        category: Option<&str>,
    ) -> Result<bool> {
        let conn = self.open()?;
        let changed = conn.execute(
            "UPDATE news SET title = ?1, content = ?2, image = ?3, category = ?4 WHERE id = ?5",
            params![
                title,
                content,
                image,
                category.unwrap_or("general"),
                id
            ],
        )?;
        Ok(changed > 0)
    }

    pub fn delete_news(&self, id: i64) -> Result<bool> {
        let conn = self.open()?;
        let changed = conn.execute("DELETE FROM news WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    pub fn news_title_exists(&self, title: &str) -> Result<bool> {
        let conn = self.open()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM news WHERE title = ?1",
            params![title],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    // ===== Sections =====

    fn section_from_row(row: &Row) -> rusqlite::Result<Section> {
        Ok(Section {
            id: row.get(0)?,
            name: row.get(1)?,
            slug: row.get(2)?,
            content: row.get(3)?,
            order_index: row.get(4)?,
            is_active: row.get::<_, i64>(5)? != 0,
        })
    }

    pub fn list_sections(&self) -> Result<Vec<Section>> {
        let conn = self.open()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, slug, content, order_index, is_active
             FROM sections WHERE is_active = 1 ORDER BY order_index",
        )?;

        let sections = stmt
            .query_map([], Self::section_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(sections)
    }

    pub fn get_section_by_slug(&self, slug: &str) -> Result<Option<Section>> {
        let conn = self.open()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, slug, content, order_index, is_active
             FROM sections WHERE slug = ?1 AND is_active = 1",
        )?;

        match stmt.query_row(params![slug], Self::section_from_row) {
            Ok(section) => Ok(Some(section)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn update_section(
        &self,
        id: i64,
        name: &str,
        content: Option<&str>,
        order_index: i64,
        is_active: bool,
    ) -> Result<bool> {
        let conn = self.open()?;
        let changed = conn.execute(
            "UPDATE sections SET name = ?1, content = ?2, order_index = ?3, is_active = ?4
             WHERE id = ?5",
            params![name, content, order_index, is_active as i64, id],
        )?;
        Ok(changed > 0)
    }

    // ===== Activities =====

    fn activity_from_row(row: &Row) -> rusqlite::Result<Activity> {
        Ok(Activity {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            image: row.get(3)?,
            date: row.get(4)?,
            location: row.get(5)?,
            created_at: row.get(6)?,
        })
    }

    pub fn list_activities(&self, limit: i64) -> Result<Vec<Activity>> {
        let conn = self.open()?;
        let mut stmt = conn.prepare(
            "SELECT id, title, description, image, date, location, created_at
             FROM activities ORDER BY date DESC LIMIT ?1",
        )?;

        let activities = stmt
            .query_map(params![limit], Self::activity_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(activities)
    }

    pub fn get_activity(&self, id: i64) -> Result<Option<Activity>> {
        let conn = self.open()?;
        let mut stmt = conn.prepare(
            "SELECT id, title, description, image, date, location, created_at
             FROM activities WHERE id = ?1",
        )?;

        match stmt.query_row(params![id], Self::activity_from_row) {
            Ok(activity) => Ok(Some(activity)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn insert_activity(
        &self,
        title: &str,
        description: Option<&str>,
        image: Option<&str>,
        date: Option<&str>,
        location: Option<&str>,
    ) -> Result<i64> {
        let conn = self.open()?;
        conn.execute(
            "INSERT INTO activities (title, description, image, date, location, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                title,
                description,
                image,
                date,
                location,
                Utc::now().to_rfc3339(),
            ],
        )
        .context("Failed to insert activity")?;

        Ok(conn.last_insert_rowid())
    }

    pub fn update_activity(
        &self,
        id: i64,
        title: &str,
        description: Option<&str>,
        image: Option<&str>,
        date: Option<&str>,
        location: Option<&str>,
    ) -> Result<bool> {
        let conn = self.open()?;
        let changed = conn.execute(
            "UPDATE activities SET title = ?1, description = ?2, image = ?3, date = ?4,
             location = ?5 WHERE id = ?6",
            params![title, description, image, date, location, id],
        )?;
        Ok(changed > 0)
    }

    pub fn delete_activity(&self, id: i64) -> Result<bool> {
        let conn = self.open()?;
        let changed = conn.execute("DELETE FROM activities WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    // ===== WhatsApp posts =====

    fn whatsapp_from_row(row: &Row) -> rusqlite::Result<WhatsappPost> {
        Ok(WhatsappPost {
            id: row.get(0)?,
            content: row.get(1)?,
            image: row.get(2)?,
            external_link: row.get(3)?,
            created_at: row.get(4)?,
        })
    }

    pub fn list_whatsapp_posts(&self, limit: i64) -> Result<Vec<WhatsappPost>> {
        let conn = self.open()?;
        let mut stmt = conn.prepare(
            "SELECT id, content, image, external_link, created_at
             FROM whatsapp_posts ORDER BY created_at DESC, id DESC LIMIT ?1",
        )?;

        let posts = stmt
            .query_map(params![limit], Self::whatsapp_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(posts)
    }

    pub fn insert_whatsapp_post(
        &self,
        content: Option<&str>,
        image: Option<&str>,
        external_link: Option<&str>,
        created_at: Option<&str>,
    ) -> Result<i64> {
        let conn = self.open()?;
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO whatsapp_posts (content, image, external_link, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![content, image, external_link, created_at.unwrap_or(&now)],
        )
        .context("Failed to insert WhatsApp post")?;

        Ok(conn.last_insert_rowid())
    }

    pub fn delete_whatsapp_post(&self, id: i64) -> Result<bool> {
        let conn = self.open()?;
        let changed = conn.execute("DELETE FROM whatsapp_posts WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }
}
