//! TenantStoreApi implementation.

use super::{no_conflict, IdSequences, QuoteStoreService};
use crate::domain::keys::KeyPrefix;
use crate::domain::validation;
use crate::domain::UserLogin;
use crate::ports::inbound::TenantStoreApi;
use crate::ports::outbound::{BatchOperation, KeyValueStore, TimeSource};
use shared_types::entities::{Company, CompanyId, Quote, QuoteId, User, UserId};
use shared_types::errors::{EntityKind, QuoteError, QuoteResult};
use shared_types::params::CompanyParams;
use tracing::debug;

impl<KV, TS> QuoteStoreService<KV, TS>
where
    KV: KeyValueStore,
    TS: TimeSource,
{
    pub(crate) fn require_company(&self, id: CompanyId) -> QuoteResult<Company> {
        self.read(&KeyPrefix::company_key(id))?
            .ok_or_else(|| QuoteError::not_found(EntityKind::Company, id))
    }
}

impl<KV, TS> TenantStoreApi for QuoteStoreService<KV, TS>
where
    KV: KeyValueStore,
    TS: TimeSource,
{
    fn create_company(&self, params: &CompanyParams) -> QuoteResult<Company> {
        let name = validation::name(params.name.as_deref())?;
        let now = self.now();
        let company = Company {
            id: CompanyId(IdSequences::next(&self.sequences.company)),
            name,
            created_at: now,
            updated_at: now,
        };

        self.commit(
            vec![BatchOperation::put(
                KeyPrefix::company_key(company.id),
                Self::encode(&company)?,
            )],
            no_conflict,
        )?;

        debug!(company = %company.id, "Company created");
        Ok(company)
    }

    fn get_company(&self, id: CompanyId) -> QuoteResult<Company> {
        self.require_company(id)
    }

    fn register_user(&self, company_id: CompanyId, email: &str) -> QuoteResult<User> {
        let email = validation::email(Some(email))?;

        let lock = self.tenant_lock(company_id);
        let _guard = lock.lock();
        self.require_company(company_id)?;

        let user = User {
            id: UserId(IdSequences::next(&self.sequences.user)),
            company_id,
            email,
            created_at: self.now(),
        };
        let login = UserLogin {
            company_id,
            user_id: user.id,
        };

        self.commit(
            vec![
                BatchOperation::put_if_absent(
                    KeyPrefix::email_key(&user.email),
                    Self::encode(&login)?,
                ),
                BatchOperation::put(
                    KeyPrefix::user_key(company_id, user.id),
                    Self::encode(&user)?,
                ),
            ],
            || QuoteError::Uniqueness {
                entity: EntityKind::User,
                field: "email",
                value: user.email.clone(),
            },
        )?;

        debug!(company = %company_id, user = %user.id, "User registered");
        Ok(user)
    }

    fn find_user_by_email(&self, email: &str) -> QuoteResult<User> {
        let email = email.trim().to_lowercase();
        let login: UserLogin = self
            .read(&KeyPrefix::email_key(&email))?
            .ok_or_else(|| QuoteError::not_found(EntityKind::User, &email))?;

        self.read(&KeyPrefix::user_key(login.company_id, login.user_id))?
            .ok_or_else(|| QuoteError::not_found(EntityKind::User, &email))
    }

    fn list_users(&self, company_id: CompanyId) -> QuoteResult<Vec<User>> {
        self.require_company(company_id)?;
        self.scan(&KeyPrefix::users_of(company_id))
    }

    fn destroy_company(&self, id: CompanyId) -> QuoteResult<Vec<QuoteId>> {
        let lock = self.tenant_lock(id);
        let _guard = lock.lock();
        self.require_company(id)?;

        let users: Vec<User> = self.scan(&KeyPrefix::users_of(id))?;
        let quote_ids: Vec<QuoteId> = self
            .scan::<Quote>(&KeyPrefix::quotes_of(id))?
            .into_iter()
            .map(|quote| quote.id)
            .collect();

        let mut operations = vec![BatchOperation::delete(KeyPrefix::company_key(id))];
        for user in &users {
            operations.push(BatchOperation::delete(KeyPrefix::email_key(&user.email)));
        }
        for prefix in [
            KeyPrefix::User,
            KeyPrefix::Quote,
            KeyPrefix::LineItemDate,
            KeyPrefix::DateIndex,
            KeyPrefix::LineItem,
        ] {
            for key in self.scan_keys(&prefix.tenant_scan(id))? {
                operations.push(BatchOperation::delete(key));
            }
        }

        let removed = operations.len();
        self.commit(operations, no_conflict)?;
        self.release_tenant_lock(id);

        debug!(
            company = %id,
            users = users.len(),
            quotes = quote_ids.len(),
            keys = removed,
            "Company destroyed"
        );
        Ok(quote_ids)
    }
}
