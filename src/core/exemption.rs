use crate::domain::model::SubjectRecord;
use crate::utils::error::{GpaError, Result};
use std::collections::BTreeSet;

/// 預設不計入 GPA 的科目前綴：體育、軍訓、武術、新生訓練
pub const DEFAULT_EXEMPTIONS: &[&str] = &["PED", "MIL", "VOV", "OTP"];

/// 比對科目代碼時使用的前綴長度
pub const PREFIX_LEN: usize = 3;

/// 使用者可編輯的免計科目規則集合。
///
/// 規則一律正規化為去空白、大寫、最多三個字元。科目代碼以該前綴開頭即視為免計，
/// 三字元規則等同於「前三字元完全相同」。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExemptionSet {
    rules: BTreeSet<String>,
}

impl ExemptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        Self {
            rules: DEFAULT_EXEMPTIONS.iter().map(|p| p.to_string()).collect(),
        }
    }

    pub fn from_prefixes<I, S>(prefixes: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for prefix in prefixes {
            set.add_rule(prefix.as_ref())?;
        }
        Ok(set)
    }

    pub fn normalize_prefix(prefix: &str) -> Result<String> {
        let normalized: String = prefix.trim().to_uppercase().chars().take(PREFIX_LEN).collect();
        if normalized.is_empty() {
            return Err(GpaError::InvalidConfigValueError {
                field: "exemptions".to_string(),
                value: prefix.to_string(),
                reason: "Exemption prefix cannot be empty".to_string(),
            });
        }
        Ok(normalized)
    }

    /// 新增規則；已存在時不做任何事並回傳 false
    pub fn add_rule(&mut self, prefix: &str) -> Result<bool> {
        let rule = Self::normalize_prefix(prefix)?;
        let added = self.rules.insert(rule.clone());
        if added {
            tracing::debug!("Added exemption rule '{}'", rule);
        }
        Ok(added)
    }

    /// 移除規則；不存在時不做任何事並回傳 false
    pub fn remove_rule(&mut self, prefix: &str) -> bool {
        match Self::normalize_prefix(prefix) {
            Ok(rule) => {
                let removed = self.rules.remove(&rule);
                if removed {
                    tracing::debug!("Removed exemption rule '{}'", rule);
                }
                removed
            }
            Err(_) => false,
        }
    }

    pub fn is_exempt(&self, record: &SubjectRecord) -> bool {
        let code = record.subject_code.trim().to_uppercase();
        self.rules.iter().any(|rule| code.starts_with(rule.as_str()))
    }

    pub fn rules(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
