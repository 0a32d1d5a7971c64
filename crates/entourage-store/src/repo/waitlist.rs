use crate::error::{Result, StoreError};
use entourage_core::domain::{normalize_email, NewWaitlistEntry, WaitlistEntry, WaitlistEntryId};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use std::str::FromStr;

const ENTRY_COLUMNS: &str = "id, email, name, company, created_at";

pub struct WaitlistRepo<'a> {
    conn: &'a Connection,
}

impl<'a> WaitlistRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Appends a signup. The `UNIQUE` constraint on `email` is the only
    /// duplicate check; a violation comes back as
    /// [`StoreError::DuplicateEmail`].
    pub fn insert(&self, now_utc: i64, entry: &NewWaitlistEntry) -> Result<WaitlistEntry> {
        let id = WaitlistEntryId::new();
        let result = self.conn.execute(
            "INSERT INTO waitlist (id, email, name, company, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                id.to_string(),
                entry.email.as_str(),
                entry.name,
                entry.company,
                now_utc
            ],
        );
        if let Err(err) = result {
            if is_unique_violation(&err) {
                return Err(StoreError::DuplicateEmail(entry.email.to_string()));
            }
            return Err(err.into());
        }

        Ok(WaitlistEntry {
            id,
            email: entry.email.to_string(),
            name: entry.name.clone(),
            company: entry.company.clone(),
            created_at: now_utc,
        })
    }

    pub fn find_by_email(&self, email: &str) -> Result<Option<WaitlistEntry>> {
        let Some(email) = normalize_email(email) else {
            return Ok(None);
        };
        let sql = format!("SELECT {ENTRY_COLUMNS} FROM waitlist WHERE email = ?1;");
        let raw = self
            .conn
            .query_row(&sql, [email], read_raw_entry)
            .optional()?;
        raw.map(RawEntry::into_entry).transpose()
    }

    /// Newest first; ties fall back to email order.
    pub fn list(&self) -> Result<Vec<WaitlistEntry>> {
        let sql = format!(
            "SELECT {ENTRY_COLUMNS} FROM waitlist ORDER BY created_at DESC, email ASC;"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(read_raw_entry(row)?.into_entry()?);
        }
        Ok(entries)
    }

    pub fn count(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM waitlist;", [], |row| row.get(0))?;
        Ok(count)
    }
}

struct RawEntry {
    id: String,
    email: String,
    name: Option<String>,
    company: Option<String>,
    created_at: i64,
}

impl RawEntry {
    fn into_entry(self) -> Result<WaitlistEntry> {
        let id = WaitlistEntryId::from_str(&self.id)
            .map_err(|_| StoreError::InvalidId(self.id.clone()))?;
        Ok(WaitlistEntry {
            id,
            email: self.email,
            name: self.name,
            company: self.company,
            created_at: self.created_at,
        })
    }
}

fn read_raw_entry(row: &Row<'_>) -> rusqlite::Result<RawEntry> {
    Ok(RawEntry {
        id: row.get(0)?,
        email: row.get(1)?,
        name: row.get(2)?,
        company: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(failure, _) => {
            failure.code == ErrorCode::ConstraintViolation
                && failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        }
        _ => false,
    }
}
