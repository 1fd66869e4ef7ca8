//! Read-only tag and ingredient lookups.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{IngredientRepository, IngredientsQuery, TagRepository, TagsQuery};
use crate::domain::{Error, Ingredient, IngredientId, Tag, TagId};

/// Service implementing [`TagsQuery`] and [`IngredientsQuery`].
#[derive(Clone)]
pub struct ReferenceDataService {
    tags: Arc<dyn TagRepository>,
    ingredients: Arc<dyn IngredientRepository>,
}

impl ReferenceDataService {
    /// Create a new service with the given repositories.
    pub fn new(tags: Arc<dyn TagRepository>, ingredients: Arc<dyn IngredientRepository>) -> Self {
        Self { tags, ingredients }
    }
}

#[async_trait]
impl TagsQuery for ReferenceDataService {
    async fn list_tags(&self) -> Result<Vec<Tag>, Error> {
        Ok(self.tags.list_all().await?)
    }

    async fn tag(&self, id: TagId) -> Result<Tag, Error> {
        self.tags
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("tag {id} not found")))
    }
}

#[async_trait]
impl IngredientsQuery for ReferenceDataService {
    async fn search_ingredients(&self, name: Option<String>) -> Result<Vec<Ingredient>, Error> {
        let name = name
            .map(|raw| raw.trim().to_owned())
            .filter(|trimmed| !trimmed.is_empty());
        Ok(self.ingredients.search(name).await?)
    }

    async fn ingredient(&self, id: IngredientId) -> Result<Ingredient, Error> {
        self.ingredients
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("ingredient {id} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{
        IngredientRepositoryError, MockIngredientRepository, MockTagRepository,
        TagRepositoryError,
    };
    use rstest::rstest;

    fn service(tags: MockTagRepository, ingredients: MockIngredientRepository) -> ReferenceDataService {
        ReferenceDataService::new(Arc::new(tags), Arc::new(ingredients))
    }

    #[rstest]
    #[case(Some("  "), None)]
    #[case(Some(" sug "), Some("sug"))]
    #[case(None, None)]
    #[tokio::test]
    async fn search_normalises_the_name_filter(
        #[case] raw: Option<&str>,
        #[case] expected: Option<&'static str>,
    ) {
        let mut ingredients = MockIngredientRepository::new();
        ingredients
            .expect_search()
            .withf(move |name| name.as_deref() == expected)
            .times(1)
            .return_once(|_| Ok(Vec::new()));
        let service = service(MockTagRepository::new(), ingredients);

        service
            .search_ingredients(raw.map(str::to_owned))
            .await
            .expect("search succeeds");
    }

    #[rstest]
    #[tokio::test]
    async fn missing_tag_is_not_found() {
        let mut tags = MockTagRepository::new();
        tags.expect_find_by_id().return_once(|_| Ok(None));
        let err = service(tags, MockIngredientRepository::new())
            .tag(TagId::from_row(8))
            .await
            .expect_err("missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), "tag 8 not found");
    }

    #[rstest]
    #[tokio::test]
    async fn tag_connection_errors_are_unavailable() {
        let mut tags = MockTagRepository::new();
        tags.expect_list_all()
            .return_once(|| Err(TagRepositoryError::connection("pool timed out")));
        let err = service(tags, MockIngredientRepository::new())
            .list_tags()
            .await
            .expect_err("db down");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }

    #[rstest]
    #[tokio::test]
    async fn ingredient_query_errors_are_internal() {
        let mut ingredients = MockIngredientRepository::new();
        ingredients
            .expect_find_by_id()
            .return_once(|_| Err(IngredientRepositoryError::query("syntax error")));
        let err = service(MockTagRepository::new(), ingredients)
            .ingredient(IngredientId::from_row(1))
            .await
            .expect_err("query fails");
        assert_eq!(err.code(), ErrorCode::InternalError);
    }
}
