use std::sync::Arc;

use crate::core::config::{AppConfig, DataConfig};
use crate::employees::Employee;
use crate::leads::Lead;
use crate::requests::TransferRequest;
use crate::tasks::Task;

use super::store::{JsonCollection, ReadMode};

/// The four independent collection files.
#[derive(Debug)]
pub struct CrmStore {
    pub leads: JsonCollection<Lead>,
    pub employees: JsonCollection<Employee>,
    pub requests: JsonCollection<TransferRequest>,
    pub tasks: JsonCollection<Task>,
}

impl CrmStore {
    pub fn open(data: &DataConfig) -> Self {
        Self {
            leads: JsonCollection::new(data.leads_path(), ReadMode::Strict),
            employees: JsonCollection::new(data.employees_path(), ReadMode::SelfHealing),
            requests: JsonCollection::new(data.requests_path(), ReadMode::Strict),
            tasks: JsonCollection::new(data.tasks_path(), ReadMode::Strict),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<CrmStore>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let store = Arc::new(CrmStore::open(&config.data));
        Self { config, store }
    }
}
