//! Monthly balances and the user profile, kept in the key-value store.

use std::sync::Arc;

use gasto_domain::{mask_date, mask_phone, MonthKey, MonthlyBalance, UserProfile};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    session::Session,
    storage::KeyValueStore,
    time::{Clock, SystemClock},
    CoreError,
};

pub fn balances_key(session: &Session) -> String {
    format!("saldos_{}", session.owner())
}

pub fn profile_key(session: &Session) -> String {
    format!("perfil_{}", session.owner())
}

fn load_json<T: DeserializeOwned>(kv: &dyn KeyValueStore, key: &str) -> Result<Option<T>, CoreError> {
    match kv.get(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

fn store_json<T: Serialize + ?Sized>(kv: &dyn KeyValueStore, key: &str, value: &T) -> Result<(), CoreError> {
    let raw = serde_json::to_string(value)?;
    kv.set(key, &raw)
}

/// At most one balance per month; replacing an existing one is opt-in.
pub struct BalanceService {
    kv: Arc<dyn KeyValueStore>,
    session: Session,
    clock: Arc<dyn Clock>,
}

impl BalanceService {
    pub fn new(kv: Arc<dyn KeyValueStore>, session: Session) -> Self {
        Self {
            kv,
            session,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn current_month(&self) -> MonthKey {
        MonthKey::of(self.clock.today())
    }

    /// Recorded balances, most recent month first.
    pub fn list(&self) -> Result<Vec<MonthlyBalance>, CoreError> {
        let mut balances: Vec<MonthlyBalance> =
            load_json(self.kv.as_ref(), &balances_key(&self.session))?.unwrap_or_default();
        balances.sort_by(|a, b| b.month.cmp(&a.month));
        debug!(count = balances.len(), "balances loaded");
        Ok(balances)
    }

    pub fn for_month(&self, month: MonthKey) -> Result<Option<MonthlyBalance>, CoreError> {
        Ok(self.list()?.into_iter().find(|balance| balance.month == month))
    }

    /// Stores `amount` for `month`. Fails with [`CoreError::BalanceExists`]
    /// when the month already has a balance and `replace` is false.
    pub fn record(
        &self,
        month: MonthKey,
        amount: f64,
        replace: bool,
    ) -> Result<MonthlyBalance, CoreError> {
        if !amount.is_finite() {
            return Err(CoreError::Validation("balance must be a number".into()));
        }
        let mut balances = self.list()?;
        let existing = balances.iter().position(|balance| balance.month == month);
        if existing.is_some() && !replace {
            return Err(CoreError::BalanceExists(month));
        }

        let balance = MonthlyBalance::new(month, amount, self.clock.today());
        match existing {
            Some(index) => balances[index] = balance.clone(),
            None => balances.push(balance.clone()),
        }
        balances.sort_by(|a, b| b.month.cmp(&a.month));
        store_json(self.kv.as_ref(), &balances_key(&self.session), &balances)?;
        info!(month = %month, amount, replaced = existing.is_some(), "balance recorded");
        Ok(balance)
    }

    pub fn delete(&self, id: Uuid) -> Result<(), CoreError> {
        let mut balances = self.list()?;
        let before = balances.len();
        balances.retain(|balance| balance.id != id);
        if balances.len() == before {
            return Err(CoreError::BalanceNotFound(id));
        }
        store_json(self.kv.as_ref(), &balances_key(&self.session), &balances)?;
        info!(%id, "balance deleted");
        Ok(())
    }
}

pub struct ProfileService {
    kv: Arc<dyn KeyValueStore>,
    session: Session,
}

impl ProfileService {
    pub fn new(kv: Arc<dyn KeyValueStore>, session: Session) -> Self {
        Self { kv, session }
    }

    /// Saved profile, or an empty one for first-time users.
    pub fn load(&self) -> Result<UserProfile, CoreError> {
        Ok(load_json(self.kv.as_ref(), &profile_key(&self.session))?.unwrap_or_default())
    }

    /// Normalizes the masked fields and persists the profile.
    pub fn save(&self, profile: UserProfile) -> Result<UserProfile, CoreError> {
        let profile = UserProfile {
            name: profile.name.trim().to_string(),
            phone: mask_phone(&profile.phone),
            birth_date: mask_date(&profile.birth_date),
            profession: profile.profession.trim().to_string(),
        };
        store_json(self.kv.as_ref(), &profile_key(&self.session), &profile)?;
        info!(owner = %self.session.owner(), "profile saved");
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{memory_store::MemoryKeyValueStore, time::FixedClock};
    use chrono::NaiveDate;
    use gasto_domain::OwnerId;

    fn service() -> BalanceService {
        let session = Session::new(OwnerId::new("u1")).unwrap();
        BalanceService::new(Arc::new(MemoryKeyValueStore::new()), session).with_clock(Arc::new(
            FixedClock::on(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()),
        ))
    }

    #[test]
    fn second_balance_for_a_month_needs_replace() {
        let balances = service();
        let march = balances.current_month();
        balances.record(march, 1500.0, false).unwrap();

        let err = balances.record(march, 1800.0, false).unwrap_err();
        assert!(matches!(err, CoreError::BalanceExists(month) if month == march));

        balances.record(march, 1800.0, true).unwrap();
        let stored = balances.list().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].amount, 1800.0);
    }

    #[test]
    fn balances_are_listed_newest_month_first() {
        let balances = service();
        balances.record(MonthKey::new(2023, 12).unwrap(), 10.0, false).unwrap();
        balances.record(MonthKey::new(2024, 2).unwrap(), 20.0, false).unwrap();
        balances.record(MonthKey::new(2024, 1).unwrap(), 30.0, false).unwrap();
        let labels: Vec<String> = balances.list().unwrap().iter().map(|b| b.month.label()).collect();
        assert_eq!(labels, ["2/2024", "1/2024", "12/2023"]);
    }

    #[test]
    fn deleting_unknown_balance_fails() {
        let balances = service();
        assert!(matches!(
            balances.delete(Uuid::new_v4()),
            Err(CoreError::BalanceNotFound(_))
        ));
    }

    #[test]
    fn profile_masks_are_applied_on_save() {
        let session = Session::new(OwnerId::new("u1")).unwrap();
        let profiles = ProfileService::new(Arc::new(MemoryKeyValueStore::new()), session);
        assert_eq!(profiles.load().unwrap(), UserProfile::default());

        let saved = profiles
            .save(UserProfile {
                name: " Ana ".into(),
                phone: "11987654321".into(),
                birth_date: "01021990".into(),
                profession: "Dev".into(),
            })
            .unwrap();
        assert_eq!(saved.phone, "(11) 98765-4321");
        assert_eq!(saved.birth_date, "01/02/1990");
        assert_eq!(profiles.load().unwrap(), saved);
    }
}
