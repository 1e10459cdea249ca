//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on the todo ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{TodoCommand, TodoQuery};

use super::failure_policy::StorageFailurePolicy;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub todos_query: Arc<dyn TodoQuery>,
    pub todos_command: Arc<dyn TodoCommand>,
    pub storage_failures: StorageFailurePolicy,
}

impl HttpState {
    /// Construct state from explicit port implementations.
    #[must_use]
    pub fn new(
        todos_query: Arc<dyn TodoQuery>,
        todos_command: Arc<dyn TodoCommand>,
        storage_failures: StorageFailurePolicy,
    ) -> Self {
        Self {
            todos_query,
            todos_command,
            storage_failures,
        }
    }

    /// Construct state from one service implementing both ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use todo_backend::domain::TodoService;
    /// use todo_backend::domain::ports::FixtureTodoRepository;
    /// use todo_backend::inbound::http::failure_policy::StorageFailurePolicy;
    /// use todo_backend::inbound::http::state::HttpState;
    ///
    /// let service = Arc::new(TodoService::new(Arc::new(FixtureTodoRepository::default())));
    /// let state = HttpState::from_service(service, StorageFailurePolicy::Degrade);
    /// assert_eq!(state.storage_failures, StorageFailurePolicy::Degrade);
    /// ```
    #[must_use]
    pub fn from_service<S>(service: Arc<S>, storage_failures: StorageFailurePolicy) -> Self
    where
        S: TodoQuery + TodoCommand + 'static,
    {
        Self::new(service.clone(), service, storage_failures)
    }
}
