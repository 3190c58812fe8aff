//! In-memory document store implementing every repository port.
//!
//! Each collection is a `RwLock<HashMap>` keyed by record id. The
//! conditional claim update runs entirely under the donations write
//! lock, so it has the same exactly-one-winner property a document
//! database's conditional update provides. Uniqueness constraints
//! (email, registration number, one profile per user) are enforced by
//! scanning under the same write lock that inserts.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::{Page, PageRequest};

use crate::domain::donation::{DonationStatus, FoodDonation};
use crate::domain::id::{DonationId, NgoId, TaskId, UserId};
use crate::domain::ngo::Ngo;
use crate::domain::ports::{
    ClaimOutcome, DonationOrder, DonationQuery, DonationRepository, DonationRepositoryError,
    NgoDonationStats, NgoQuery, NgoRepository, NgoRepositoryError, TaskRepository,
    TaskRepositoryError, UserRepository, UserRepositoryError,
};
use crate::domain::task::Task;
use crate::domain::user::{EmailAddress, User};

/// Shared in-memory store; cheap to clone behind an `Arc` and safe to
/// hand to every service at once.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<UserId, User>>,
    ngos: RwLock<HashMap<NgoId, Ngo>>,
    donations: RwLock<HashMap<DonationId, FoodDonation>>,
    tasks: RwLock<HashMap<TaskId, Task>>,
}

fn poisoned<E>(make: impl FnOnce(String) -> E) -> E {
    make("store lock poisoned".to_owned())
}

fn read<'a, K, V, E>(
    lock: &'a RwLock<HashMap<K, V>>,
    make: impl FnOnce(String) -> E,
) -> Result<RwLockReadGuard<'a, HashMap<K, V>>, E> {
    lock.read().map_err(|_| poisoned(make))
}

fn write<'a, K, V, E>(
    lock: &'a RwLock<HashMap<K, V>>,
    make: impl FnOnce(String) -> E,
) -> Result<RwLockWriteGuard<'a, HashMap<K, V>>, E> {
    lock.write().map_err(|_| poisoned(make))
}

/// Select one page from a filtered, sorted snapshot.
fn paginate<T: Clone>(mut matches: Vec<&T>, page: PageRequest) -> Page<T> {
    let total = matches.len() as u64;
    let items = matches
        .drain(..)
        .skip(page.offset())
        .take(page.limit() as usize)
        .cloned()
        .collect();
    Page::new(items, total, page)
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut users = write(&self.users, UserRepositoryError::storage)?;
        if users.values().any(|u| u.email == user.email) {
            return Err(UserRepositoryError::EmailTaken {
                email: user.email.as_str().to_owned(),
            });
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError> {
        let users = read(&self.users, UserRepositoryError::storage)?;
        Ok(users.get(&id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserRepositoryError> {
        let users = read(&self.users, UserRepositoryError::storage)?;
        Ok(users.values().find(|u| &u.email == email).cloned())
    }
}

#[async_trait]
impl NgoRepository for MemoryStore {
    async fn insert(&self, ngo: &Ngo) -> Result<(), NgoRepositoryError> {
        let mut ngos = write(&self.ngos, NgoRepositoryError::storage)?;
        if ngos
            .values()
            .any(|n| n.profile.registration_number == ngo.profile.registration_number)
        {
            return Err(NgoRepositoryError::DuplicateRegistrationNumber {
                registration_number: ngo.profile.registration_number.clone(),
            });
        }
        if ngos.values().any(|n| n.user == ngo.user) {
            return Err(NgoRepositoryError::DuplicateOwner);
        }
        ngos.insert(ngo.id, ngo.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: NgoId) -> Result<Option<Ngo>, NgoRepositoryError> {
        let ngos = read(&self.ngos, NgoRepositoryError::storage)?;
        Ok(ngos.get(&id).cloned())
    }

    async fn find_by_user(&self, user: UserId) -> Result<Option<Ngo>, NgoRepositoryError> {
        let ngos = read(&self.ngos, NgoRepositoryError::storage)?;
        Ok(ngos.values().find(|n| n.user == user).cloned())
    }

    async fn update(&self, ngo: &Ngo) -> Result<(), NgoRepositoryError> {
        let mut ngos = write(&self.ngos, NgoRepositoryError::storage)?;
        if ngos.values().any(|n| {
            n.id != ngo.id && n.profile.registration_number == ngo.profile.registration_number
        }) {
            return Err(NgoRepositoryError::DuplicateRegistrationNumber {
                registration_number: ngo.profile.registration_number.clone(),
            });
        }
        match ngos.get_mut(&ngo.id) {
            Some(slot) => {
                *slot = ngo.clone();
                Ok(())
            }
            None => Err(NgoRepositoryError::Missing),
        }
    }

    async fn find_page(
        &self,
        query: &NgoQuery,
        page: PageRequest,
    ) -> Result<Page<Ngo>, NgoRepositoryError> {
        let ngos = read(&self.ngos, NgoRepositoryError::storage)?;
        let mut matches: Vec<&Ngo> = ngos
            .values()
            .filter(|n| {
                query
                    .verification_status
                    .is_none_or(|s| n.verification_status == s)
                    && query.is_active.is_none_or(|a| n.is_active == a)
                    && query
                        .city
                        .as_deref()
                        .is_none_or(|c| contains_ci(&n.profile.address.city, c))
                    && query
                        .service_area
                        .as_deref()
                        .is_none_or(|a| n.profile.serves_area(a))
            })
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(matches, page))
    }
}

#[async_trait]
impl DonationRepository for MemoryStore {
    async fn insert(&self, donation: &FoodDonation) -> Result<(), DonationRepositoryError> {
        let mut donations = write(&self.donations, DonationRepositoryError::storage)?;
        donations.insert(donation.id, donation.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: DonationId,
    ) -> Result<Option<FoodDonation>, DonationRepositoryError> {
        let donations = read(&self.donations, DonationRepositoryError::storage)?;
        Ok(donations.get(&id).cloned())
    }

    async fn update(&self, donation: &FoodDonation) -> Result<(), DonationRepositoryError> {
        let mut donations = write(&self.donations, DonationRepositoryError::storage)?;
        match donations.get_mut(&donation.id) {
            Some(slot) => {
                *slot = donation.clone();
                Ok(())
            }
            None => Err(DonationRepositoryError::Missing),
        }
    }

    async fn delete(&self, id: DonationId) -> Result<bool, DonationRepositoryError> {
        let mut donations = write(&self.donations, DonationRepositoryError::storage)?;
        Ok(donations.remove(&id).is_some())
    }

    async fn claim_if_available(
        &self,
        id: DonationId,
        ngo: NgoId,
        at: DateTime<Utc>,
    ) -> Result<ClaimOutcome, DonationRepositoryError> {
        // Check and mutation happen under one write guard; concurrent
        // claimants serialize here and exactly one sees `available`.
        let mut donations = write(&self.donations, DonationRepositoryError::storage)?;
        let Some(donation) = donations.get_mut(&id) else {
            return Ok(ClaimOutcome::Missing);
        };
        if donation.status != DonationStatus::Available {
            return Ok(ClaimOutcome::Unavailable(donation.status));
        }
        donation.status = DonationStatus::Claimed;
        donation.claimed_by = Some(ngo);
        donation.claimed_at = Some(at);
        donation.updated_at = at;
        Ok(ClaimOutcome::Claimed(donation.clone()))
    }

    async fn find_page(
        &self,
        query: &DonationQuery,
        page: PageRequest,
    ) -> Result<Page<FoodDonation>, DonationRepositoryError> {
        let donations = read(&self.donations, DonationRepositoryError::storage)?;
        let mut matches: Vec<&FoodDonation> = donations
            .values()
            .filter(|d| {
                query
                    .statuses
                    .as_deref()
                    .is_none_or(|s| s.contains(&d.status))
                    && query.donor_type.is_none_or(|t| d.donor_type == t)
                    && query
                        .city
                        .as_deref()
                        .is_none_or(|c| contains_ci(&d.pickup_address.city, c))
                    && query.donor.is_none_or(|u| d.donor == u)
                    && query.claimed_by.is_none_or(|n| d.claimed_by == Some(n))
            })
            .collect();
        match query.order {
            DonationOrder::CreatedDesc => {
                matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            }
            DonationOrder::ClaimedDesc => {
                matches.sort_by(|a, b| b.claimed_at.cmp(&a.claimed_at));
            }
        }
        Ok(paginate(matches, page))
    }

    async fn stats_for_ngo(
        &self,
        ngo: NgoId,
    ) -> Result<NgoDonationStats, DonationRepositoryError> {
        let donations = read(&self.donations, DonationRepositoryError::storage)?;
        let mut stats = NgoDonationStats::default();
        for donation in donations.values() {
            if donation.claimed_by != Some(ngo) {
                continue;
            }
            stats.total_claimed += 1;
            match donation.status {
                DonationStatus::Claimed => stats.pending_pickups += 1,
                DonationStatus::Delivered => stats.completed_deliveries += 1,
                _ => {}
            }
        }
        Ok(stats)
    }
}

#[async_trait]
impl TaskRepository for MemoryStore {
    async fn insert(&self, task: &Task) -> Result<(), TaskRepositoryError> {
        let mut tasks = write(&self.tasks, TaskRepositoryError::storage)?;
        tasks.insert(task.id, task.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> Result<Option<Task>, TaskRepositoryError> {
        let tasks = read(&self.tasks, TaskRepositoryError::storage)?;
        Ok(tasks.get(&id).cloned())
    }

    async fn update(&self, task: &Task) -> Result<(), TaskRepositoryError> {
        let mut tasks = write(&self.tasks, TaskRepositoryError::storage)?;
        match tasks.get_mut(&task.id) {
            Some(slot) => {
                *slot = task.clone();
                Ok(())
            }
            None => Err(TaskRepositoryError::Missing),
        }
    }

    async fn delete(&self, id: TaskId) -> Result<bool, TaskRepositoryError> {
        let mut tasks = write(&self.tasks, TaskRepositoryError::storage)?;
        Ok(tasks.remove(&id).is_some())
    }

    async fn list_for_user(
        &self,
        user: UserId,
        page: PageRequest,
    ) -> Result<Page<Task>, TaskRepositoryError> {
        let tasks = read(&self.tasks, TaskRepositoryError::storage)?;
        let mut matches: Vec<&Task> = tasks.values().filter(|t| t.user == user).collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(matches, page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::donation::tests::draft;
    use std::sync::Arc;

    fn available_donation() -> FoodDonation {
        FoodDonation::create(UserId::random(), draft(), Utc::now()).expect("valid draft")
    }

    #[actix_rt::test]
    async fn concurrent_claims_have_one_winner() {
        let store = Arc::new(MemoryStore::new());
        let donation = available_donation();
        DonationRepository::insert(store.as_ref(), &donation)
            .await
            .expect("insert");

        let first = Arc::clone(&store);
        let second = Arc::clone(&store);
        let id = donation.id;
        let (a, b) = futures::join!(
            first.claim_if_available(id, NgoId::random(), Utc::now()),
            second.claim_if_available(id, NgoId::random(), Utc::now()),
        );
        let outcomes = [a.expect("claim"), b.expect("claim")];
        let winners = outcomes
            .iter()
            .filter(|o| matches!(o, ClaimOutcome::Claimed(_)))
            .count();
        let losers = outcomes
            .iter()
            .filter(|o| matches!(o, ClaimOutcome::Unavailable(DonationStatus::Claimed)))
            .count();
        assert_eq!(winners, 1);
        assert_eq!(losers, 1);
    }

    #[actix_rt::test]
    async fn claim_on_missing_record_reports_missing() {
        let store = MemoryStore::new();
        let outcome = store
            .claim_if_available(DonationId::random(), NgoId::random(), Utc::now())
            .await
            .expect("claim");
        assert_eq!(outcome, ClaimOutcome::Missing);
    }

    #[actix_rt::test]
    async fn donation_pages_sort_newest_first() {
        let store = MemoryStore::new();
        let mut older = available_donation();
        older.created_at = Utc::now() - chrono::Duration::hours(1);
        let newer = available_donation();
        DonationRepository::insert(&store, &older).await.expect("insert");
        DonationRepository::insert(&store, &newer).await.expect("insert");

        let page = DonationRepository::find_page(
            &store,
            &DonationQuery::default(),
            PageRequest::new(None, None).expect("page"),
        )
        .await
        .expect("page");
        assert_eq!(page.total, 2);
        assert_eq!(page.items[0].id, newer.id);
    }

    #[actix_rt::test]
    async fn pagination_splits_and_counts() {
        let store = MemoryStore::new();
        for _ in 0..5 {
            DonationRepository::insert(&store, &available_donation())
                .await
                .expect("insert");
        }
        let page = DonationRepository::find_page(
            &store,
            &DonationQuery::default(),
            PageRequest::new(Some(2), Some(2)).expect("page"),
        )
        .await
        .expect("page");
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total, 5);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.current_page, 2);
    }
}
