//! Accounts, memberships, iterations and epics

use super::get_value;
use crate::error::Result;
use crate::http::{ApiRequest, Transport};
use crate::models::{
    decode_entities, decode_entity, Account, AccountMembership, Epic, Iteration, ProjectMembership,
};
use std::sync::Arc;

/// Accounts the token can see
#[derive(Clone)]
pub struct AccountService {
    transport: Arc<dyn Transport>,
}

impl AccountService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn get(&self, account_id: u64) -> Result<Account> {
        let request = ApiRequest::get(format!("accounts/{account_id}"));
        decode_entity(get_value(self.transport.as_ref(), request).await?)
    }

    /// Membership service bound to one account
    pub fn memberships(&self, account_id: u64) -> AccountMembershipService {
        AccountMembershipService::new(self.transport.clone(), account_id)
    }
}

/// Members of one account
#[derive(Clone)]
pub struct AccountMembershipService {
    transport: Arc<dyn Transport>,
    account_id: u64,
}

impl AccountMembershipService {
    pub fn new(transport: Arc<dyn Transport>, account_id: u64) -> Self {
        Self {
            transport,
            account_id,
        }
    }

    pub fn account_id(&self) -> u64 {
        self.account_id
    }

    pub async fn list(&self) -> Result<Vec<AccountMembership>> {
        let request = ApiRequest::get(format!("accounts/{}/memberships", self.account_id));
        decode_entities(get_value(self.transport.as_ref(), request).await?)
    }
}

/// Members of a project
#[derive(Clone)]
pub struct MembershipService {
    transport: Arc<dyn Transport>,
}

impl MembershipService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn list(&self, project_id: u64) -> Result<Vec<ProjectMembership>> {
        let request = ApiRequest::get(format!("projects/{project_id}/memberships"));
        decode_entities(get_value(self.transport.as_ref(), request).await?)
    }
}

/// Iterations of a project
#[derive(Clone)]
pub struct IterationService {
    transport: Arc<dyn Transport>,
}

impl IterationService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Iteration by its number within the project
    pub async fn get(&self, project_id: u64, number: u64) -> Result<Iteration> {
        let request = ApiRequest::get(format!("projects/{project_id}/iterations/{number}"));
        decode_entity(get_value(self.transport.as_ref(), request).await?)
    }

    /// Iterations matching `scope` (`done`, `current`, `backlog`, ...); all
    /// iterations when `None`
    pub async fn list(&self, project_id: u64, scope: Option<&str>) -> Result<Vec<Iteration>> {
        let mut request = ApiRequest::get(format!("projects/{project_id}/iterations"));
        if let Some(scope) = scope.filter(|s| !s.is_empty()) {
            request = request.query("scope", scope);
        }
        decode_entities(get_value(self.transport.as_ref(), request).await?)
    }
}

/// Epics of a project
#[derive(Clone)]
pub struct EpicService {
    transport: Arc<dyn Transport>,
}

impl EpicService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn list(&self, project_id: u64) -> Result<Vec<Epic>> {
        let request = ApiRequest::get(format!("projects/{project_id}/epics"));
        decode_entities(get_value(self.transport.as_ref(), request).await?)
    }

    pub async fn get(&self, project_id: u64, epic_id: u64) -> Result<Epic> {
        let request = ApiRequest::get(format!("projects/{project_id}/epics/{epic_id}"));
        decode_entity(get_value(self.transport.as_ref(), request).await?)
    }
}
