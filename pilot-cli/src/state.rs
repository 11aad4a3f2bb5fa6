//! File-backed persistence for per-company snapshots and insight batches.
//!
//! Layout: `$FOUNDERPILOT_HOME/companies/<company>/{snapshot.json,insights.json}`

use anyhow::{Context, Result, bail};
use pilot_core::{FinancialSnapshot, Insight, InsightStatus};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

pub fn founderpilot_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("FOUNDERPILOT_HOME") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".founderpilot"))
}

pub fn ensure_home() -> Result<PathBuf> {
    let dir = founderpilot_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub struct CompanyStore {
    root: PathBuf,
}

impl CompanyStore {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self { root: home.into().join("companies") }
    }

    pub fn company_dir(&self, company_id: &str) -> Result<PathBuf> {
        validate_company_id(company_id)?;
        Ok(self.root.join(company_id))
    }

    fn snapshot_path(&self, company_id: &str) -> Result<PathBuf> {
        Ok(self.company_dir(company_id)?.join("snapshot.json"))
    }

    fn insights_path(&self, company_id: &str) -> Result<PathBuf> {
        Ok(self.company_dir(company_id)?.join("insights.json"))
    }

    pub fn load_snapshot(&self, company_id: &str) -> Result<Option<FinancialSnapshot>> {
        read_json(&self.snapshot_path(company_id)?)
    }

    pub fn save_snapshot(&self, company_id: &str, snapshot: &FinancialSnapshot) -> Result<()> {
        write_json_atomic(&self.snapshot_path(company_id)?, snapshot)
    }

    pub fn load_insights(&self, company_id: &str) -> Result<Vec<Insight>> {
        Ok(read_json(&self.insights_path(company_id)?)?.unwrap_or_default())
    }

    /// Discard the stored batch and commit `insights` in its place.
    ///
    /// The new batch lands in a temp file first and is renamed over the old one,
    /// so readers see either the old batch or the new one, never a mix.
    pub fn replace_insights(&self, company_id: &str, insights: &[Insight]) -> Result<()> {
        if let Some(foreign) = insights.iter().find(|i| i.company_id != company_id) {
            bail!(
                "insight {} belongs to company {}, not {}",
                foreign.id,
                foreign.company_id,
                company_id
            );
        }
        write_json_atomic(&self.insights_path(company_id)?, &insights)?;
        tracing::info!(company_id, count = insights.len(), "replaced insight batch");
        Ok(())
    }

    /// Mark one stored insight as resolved. Returns the updated insight.
    pub fn resolve_insight(&self, company_id: &str, insight_id: &str) -> Result<Insight> {
        let mut insights = self.load_insights(company_id)?;
        let Some(insight) = insights.iter_mut().find(|i| i.id == insight_id) else {
            bail!("no insight {} for company {}", insight_id, company_id);
        };
        if insight.status == InsightStatus::Resolved {
            tracing::debug!(insight_id, "insight already resolved");
            return Ok(insight.clone());
        }
        insight.resolve();
        let resolved = insight.clone();
        self.replace_insights(company_id, &insights)?;
        Ok(resolved)
    }
}

fn validate_company_id(company_id: &str) -> Result<()> {
    let ok = !company_id.is_empty()
        && company_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !ok {
        bail!("invalid company id '{company_id}' (use letters, digits, '-' or '_')");
    }
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
    Ok(Some(value))
}

fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let dir = path
        .parent()
        .with_context(|| format!("no parent directory for {}", path.display()))?;
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;

    let json = serde_json::to_string_pretty(value)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}
