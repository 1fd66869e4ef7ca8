//! Integration tests for the Diesel tag and ingredient repositories.
//!
//! Run against `FOODGRAM_TEST_DATABASE_URL`; each test skips when it is unset.

mod support;

use foodgram::domain::ports::{IngredientRepository, TagRepository};
use foodgram::domain::{NewIngredient, TagId};
use foodgram::outbound::persistence::{DieselIngredientRepository, DieselTagRepository};
use rstest::rstest;

use support::TestDatabase;

fn ingredient(name: &str, unit: &str) -> NewIngredient {
    NewIngredient::new(name, unit).expect("valid ingredient")
}

#[rstest]
#[tokio::test]
async fn migrations_seed_the_three_meal_tags() {
    let Some(db) = TestDatabase::provision().await else {
        return;
    };
    let tags = DieselTagRepository::new(db.pool.clone());

    let all = tags.list_all().await.expect("list tags");
    let slugs: Vec<_> = all.iter().map(|tag| tag.slug.as_ref().to_owned()).collect();
    assert_eq!(slugs, ["breakfast", "lunch", "dinner"]);

    let dinner = tags
        .find_by_id(TagId::new(3).expect("positive id"))
        .await
        .expect("find tag")
        .expect("dinner exists");
    assert_eq!(dinner.name, "Dinner");
    assert!(
        tags.find_by_id(TagId::new(99).expect("positive id"))
            .await
            .expect("find tag")
            .is_none()
    );
}

#[rstest]
#[tokio::test]
async fn import_skips_existing_name_and_unit_pairs() {
    let Some(db) = TestDatabase::provision().await else {
        return;
    };
    let repo = DieselIngredientRepository::new(db.pool.clone());

    let first = repo
        .import(&[ingredient("flour", "g"), ingredient("milk", "ml")])
        .await
        .expect("first import");
    assert_eq!((first.inserted, first.skipped), (2, 0));

    let second = repo
        .import(&[
            ingredient("flour", "g"),
            ingredient("flour", "kg"),
            ingredient("sugar", "g"),
        ])
        .await
        .expect("second import");
    assert_eq!((second.inserted, second.skipped), (2, 1));

    let everything = repo.search(None).await.expect("search all");
    assert_eq!(everything.len(), 4);
}

#[rstest]
#[tokio::test]
async fn search_matches_names_case_insensitively_in_name_order() {
    let Some(db) = TestDatabase::provision().await else {
        return;
    };
    let repo = DieselIngredientRepository::new(db.pool.clone());
    repo.import(&[
        ingredient("oat milk", "ml"),
        ingredient("milk", "ml"),
        ingredient("flour", "g"),
    ])
    .await
    .expect("import");

    let found = repo.search(Some("MILK".to_owned())).await.expect("search");
    let names: Vec<_> = found.iter().map(|item| item.name.as_str()).collect();
    assert_eq!(names, ["milk", "oat milk"]);

    let ids: Vec<_> = found.iter().map(|item| item.id).collect();
    let fetched = repo.find_by_ids(&ids).await.expect("find by ids");
    assert_eq!(fetched.len(), 2);
}
