use crate::error::{Error, Result};
use crate::profile::ProfileStore;
use crate::ryzenadj::{Field, PerformanceMode, RyzenAdj, SetStatus};
use serde::Serialize;

/// Name reported when the live limits match no stored profile.
pub const SYSTEM_DEFAULT: &str = "system-default";

/// Argument to `list` that selects category listing instead of a category name.
pub const CATEGORIES: &str = "categories";

/// Distinct profile categories in first-seen order. Profiles without one are skipped.
pub fn list_categories(store: &ProfileStore) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();
    for category in store.iter().filter_map(|p| p.category()) {
        if !categories.iter().any(|c| c == category) {
            categories.push(category.to_string());
        }
    }
    categories
}

/// Profile names whose category equals `name`, or all categories when
/// `name` is the literal `categories`.
pub fn list_by_category(name: &str, store: &ProfileStore) -> Vec<String> {
    if name == CATEGORIES {
        return list_categories(store);
    }
    store
        .iter()
        .filter(|p| p.category() == Some(name))
        .map(|p| p.name.clone())
        .collect()
}

/// Result of one setter call.
#[derive(Debug, Clone, Serialize)]
pub struct FieldOutcome {
    pub field: Field,
    pub value: u32,
    pub status: SetStatus,
}

impl FieldOutcome {
    pub fn error_message(&self) -> Option<String> {
        self.status.message(self.field.setter())
    }
}

/// Per-call outcomes of applying a profile.
#[derive(Debug, Clone, Serialize)]
pub struct ApplyReport {
    pub profile: String,
    pub fields: Vec<FieldOutcome>,
    pub mode: PerformanceMode,
    pub mode_status: SetStatus,
}

impl ApplyReport {
    pub fn mode_error_message(&self) -> Option<String> {
        self.mode_status.message(self.mode.symbol())
    }

    /// Number of calls the SMU did not accept.
    pub fn failure_count(&self) -> usize {
        self.fields.iter().filter(|f| !f.status.is_ok()).count()
            + usize::from(!self.mode_status.is_ok())
    }
}

/// Push the named profile into the SMU.
///
/// The profile is validated in full before the first native call, so an
/// unknown name or a malformed entry never leaves a half-applied profile.
/// Once writing starts, a rejected field does not stop the others.
pub fn apply_profile(
    store: &ProfileStore,
    name: &str,
    adj: &mut impl RyzenAdj,
) -> Result<ApplyReport> {
    let profile = store
        .get(name)
        .ok_or_else(|| Error::UnknownProfile(name.to_string()))?;
    let values = profile.values()?;

    let fields = Field::ALL
        .into_iter()
        .map(|field| {
            let value = values.limit(field);
            let status = SetStatus::from_code(adj.set(field, value));
            if !status.is_ok() {
                tracing::debug!(%field, value, ?status, "setter refused");
            }
            FieldOutcome {
                field,
                value,
                status,
            }
        })
        .collect();

    let mode = PerformanceMode::from_max_performance(values.max_performance);
    let mode_status = SetStatus::from_code(adj.enable(mode));

    Ok(ApplyReport {
        profile: profile.name.clone(),
        fields,
        mode,
        mode_status,
    })
}

/// Live SMU limits and the profile they correspond to.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentProfile {
    pub profile: String,
    pub values: Vec<(Field, i64)>,
}

impl CurrentProfile {
    pub fn is_system_default(&self) -> bool {
        self.profile == SYSTEM_DEFAULT
    }
}

/// Read the live limits and report the first stored profile that matches
/// them exactly, or `system-default` when none does.
pub fn current_profile(store: &ProfileStore, adj: &mut impl RyzenAdj) -> CurrentProfile {
    let res = adj.refresh();
    if res != 0 {
        tracing::warn!(res, "refresh_table failed, readings may be stale");
    }

    let mut live = [0i64; 7];
    for field in Field::ALL {
        live[field as usize] = field.to_store_value(adj.get(field));
    }

    let profile = store
        .iter()
        .find(|p| match p.values() {
            Ok(values) => values.matches(&live),
            Err(e) => {
                tracing::warn!("skipping profile while matching: {}", e);
                false
            }
        })
        .map(|p| p.name.clone())
        .unwrap_or_else(|| SYSTEM_DEFAULT.to_string());

    CurrentProfile {
        profile,
        values: Field::ALL
            .into_iter()
            .map(|f| (f, live[f as usize]))
            .collect(),
    }
}
