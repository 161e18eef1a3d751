//! Person API client methods

use super::{ApiClient, ApiError};
use crate::query::FilterSet;
use crate::types::{Page, Person, PersonDraft, PersonFilters, PersonId, PersonPatch};
use reqwest::Method;

const PERSONS_PATH: &str = "/api/v1/auth/persons";

impl ApiClient {
    /// List persons matching `filters`
    pub async fn list_persons(&self, filters: &PersonFilters) -> Result<Page<Person>, ApiError> {
        let query = filters.to_query();
        let request = self
            .request(Method::GET, &format!("{PERSONS_PATH}/"))
            .query(query.pairs());
        self.execute(request).await
    }

    pub async fn get_person(&self, id: PersonId) -> Result<Person, ApiError> {
        let request = self.request(Method::GET, &format!("{PERSONS_PATH}/{id}/"));
        self.execute(request).await
    }

    pub async fn create_person(&self, person: &PersonDraft) -> Result<Person, ApiError> {
        let request = self
            .request(Method::POST, &format!("{PERSONS_PATH}/"))
            .json(person);
        self.execute(request).await
    }

    /// Partially update a person; unset fields are left alone
    pub async fn update_person(
        &self,
        id: PersonId,
        patch: &PersonPatch,
    ) -> Result<Person, ApiError> {
        let request = self
            .request(Method::PATCH, &format!("{PERSONS_PATH}/{id}/"))
            .json(patch);
        self.execute(request).await
    }

    pub async fn delete_person(&self, id: PersonId) -> Result<(), ApiError> {
        let request = self.request(Method::DELETE, &format!("{PERSONS_PATH}/{id}/"));
        self.execute_empty(request).await
    }
}
