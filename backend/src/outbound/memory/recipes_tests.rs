//! Tests for the in-memory recipe repositories.

use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{IngredientRepository, UserRepository};
use crate::domain::{
    Amount, CookingTime, IngredientId, NewIngredient, NewUser, PasswordHash, RecipeName, TagSlug,
    UserProfileFields,
};

struct Seeded {
    store: MemoryStore,
    ada: UserId,
    bob: UserId,
}

#[fixture]
async fn seeded() -> Seeded {
    let store = MemoryStore::new();
    let mut ids = Vec::new();
    for name in ["ada", "bob"] {
        let user = UserRepository::create(
            &store,
            &NewUser {
                profile: UserProfileFields::try_from_parts(
                    &format!("{name}@example.com"),
                    name,
                    "",
                    "",
                )
                .expect("profile"),
                password_hash: PasswordHash::new("hash"),
            },
        )
        .await
        .expect("user");
        ids.push(user.id());
    }
    let rows = [("flour", "g"), ("milk", "ml")]
        .map(|(name, unit)| NewIngredient::new(name, unit).expect("ingredient"));
    store.import(&rows).await.expect("import");
    Seeded {
        store,
        ada: ids[0],
        bob: ids[1],
    }
}

fn line(ingredient: i64, amount: i64) -> IngredientAmount {
    IngredientAmount {
        ingredient: IngredientId::from_row(ingredient),
        amount: Amount::new(amount).expect("amount"),
    }
}

fn new_recipe(author: UserId, name: &str, ingredients: Vec<IngredientAmount>, tag: i64) -> NewRecipe {
    NewRecipe {
        author,
        name: RecipeName::new(name).expect("name"),
        text: "Mix.".to_owned(),
        cooking_time: CookingTime::new(5).expect("time"),
        image_path: format!("recipes/images/{name}.png"),
        ingredients,
        tags: vec![TagId::from_row(tag)],
    }
}

#[rstest]
#[tokio::test]
async fn create_resolves_tags_and_ingredients(#[future] seeded: Seeded) {
    let Seeded { store, ada, .. } = seeded.await;
    let id = RecipeRepository::create(&store, &new_recipe(ada, "pancakes", vec![line(1, 200)], 1))
        .await
        .expect("create");

    let recipe = RecipeRepository::find_by_id(&store, id)
        .await
        .expect("lookup")
        .expect("present");
    assert_eq!(recipe.name, "pancakes");
    assert_eq!(recipe.tags[0].slug.as_ref(), "breakfast");
    assert_eq!(recipe.ingredients[0].ingredient.name, "flour");
    assert_eq!(recipe.ingredients[0].amount.get(), 200);
}

#[rstest]
#[case(vec![line(9, 1)], 1, "ingredient 9")]
#[case(vec![line(1, 1)], 9, "tag 9")]
#[tokio::test]
async fn create_rejects_unknown_references(
    #[future] seeded: Seeded,
    #[case] ingredients: Vec<IngredientAmount>,
    #[case] tag: i64,
    #[case] mentions: &str,
) {
    let Seeded { store, ada, .. } = seeded.await;
    let err = RecipeRepository::create(&store, &new_recipe(ada, "broken", ingredients, tag))
        .await
        .expect_err("unknown reference");
    assert!(matches!(err, RecipeRepositoryError::UnknownReference { .. }));
    assert!(err.to_string().contains(mentions));
}

#[rstest]
#[tokio::test]
async fn update_replaces_collections_wholesale(#[future] seeded: Seeded) {
    let Seeded { store, ada, .. } = seeded.await;
    let id = RecipeRepository::create(
        &store,
        &new_recipe(ada, "pancakes", vec![line(1, 200), line(2, 300)], 1),
    )
    .await
    .expect("create");

    let changes = RecipeChanges {
        ingredients: Some(vec![line(2, 50)]),
        ..RecipeChanges::default()
    };
    assert!(store.update(id, &changes).await.expect("update"));
    let recipe = RecipeRepository::find_by_id(&store, id)
        .await
        .expect("lookup")
        .expect("present");
    assert_eq!(recipe.ingredients.len(), 1);
    assert_eq!(recipe.ingredients[0].ingredient.name, "milk");
    assert_eq!(recipe.tags.len(), 1);

    assert!(
        !store
            .update(RecipeId::from_row(99), &changes)
            .await
            .expect("missing")
    );
}

#[rstest]
#[tokio::test]
async fn list_filters_and_orders_newest_first(#[future] seeded: Seeded) {
    let Seeded { store, ada, bob } = seeded.await;
    let first = RecipeRepository::create(&store, &new_recipe(ada, "first", vec![line(1, 1)], 1))
        .await
        .expect("first");
    let second = RecipeRepository::create(&store, &new_recipe(bob, "second", vec![line(1, 1)], 2))
        .await
        .expect("second");
    let third = RecipeRepository::create(&store, &new_recipe(ada, "third", vec![line(1, 1)], 3))
        .await
        .expect("third");
    store
        .add(RecipeList::Favorites, bob, first)
        .await
        .expect("favorite");

    let all = RecipeRepository::list(&store, &RecipeFilter::default(), PageRequest::first())
        .await
        .expect("all");
    let ids: Vec<RecipeId> = all.items.iter().map(|recipe| recipe.id).collect();
    assert_eq!(ids, vec![third, second, first]);

    let by_ada = RecipeFilter {
        author: Some(ada),
        ..RecipeFilter::default()
    };
    let page = RecipeRepository::list(&store, &by_ada, PageRequest::first())
        .await
        .expect("by author");
    assert_eq!(page.total, 2);

    let by_tags = RecipeFilter {
        tags: vec![
            TagSlug::new("lunch").expect("slug"),
            TagSlug::new("dinner").expect("slug"),
        ],
        ..RecipeFilter::default()
    };
    let page = RecipeRepository::list(&store, &by_tags, PageRequest::first())
        .await
        .expect("by tags");
    let ids: Vec<RecipeId> = page.items.iter().map(|recipe| recipe.id).collect();
    assert_eq!(ids, vec![third, second]);

    let favorited = RecipeFilter {
        favorited_by: Some(bob),
        ..RecipeFilter::default()
    };
    let page = RecipeRepository::list(&store, &favorited, PageRequest::first())
        .await
        .expect("favorites");
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id, first);
}

#[rstest]
#[tokio::test]
async fn list_pairs_are_unique_and_cleared_on_delete(#[future] seeded: Seeded) {
    let Seeded { store, ada, bob } = seeded.await;
    let id = RecipeRepository::create(&store, &new_recipe(ada, "soup", vec![line(2, 1)], 2))
        .await
        .expect("create");

    assert!(store.add(RecipeList::ShoppingCart, bob, id).await.expect("add"));
    assert!(!store.add(RecipeList::ShoppingCart, bob, id).await.expect("again"));
    let contained = store
        .contained(RecipeList::ShoppingCart, bob, &[id])
        .await
        .expect("contained");
    assert!(contained.contains(&id));
    assert!(
        store
            .contained(RecipeList::Favorites, bob, &[id])
            .await
            .expect("favorites")
            .is_empty()
    );

    assert!(store.delete(id).await.expect("delete"));
    assert!(!store.delete(id).await.expect("gone"));
    assert!(
        store
            .contained(RecipeList::ShoppingCart, bob, &[id])
            .await
            .expect("after delete")
            .is_empty()
    );
    assert!(store.add(RecipeList::Favorites, bob, id).await.is_err());
}

#[rstest]
#[tokio::test]
async fn summaries_respect_limit_and_count(#[future] seeded: Seeded) {
    let Seeded { store, ada, .. } = seeded.await;
    for name in ["a", "b", "c"] {
        RecipeRepository::create(&store, &new_recipe(ada, name, vec![line(1, 1)], 1))
            .await
            .expect("create");
    }
    let (summaries, total) = store
        .summaries_by_author(ada, RecipesLimit::at_most(2))
        .await
        .expect("summaries");
    assert_eq!(total, 3);
    let names: Vec<&str> = summaries.iter().map(|summary| summary.name.as_str()).collect();
    assert_eq!(names, vec!["c", "b"]);
}

#[rstest]
#[tokio::test]
async fn shopping_list_lines_cover_every_cart_recipe(#[future] seeded: Seeded) {
    let Seeded { store, ada, bob } = seeded.await;
    let pancakes = RecipeRepository::create(
        &store,
        &new_recipe(ada, "pancakes", vec![line(1, 200), line(2, 300)], 1),
    )
    .await
    .expect("pancakes");
    let bread = RecipeRepository::create(&store, &new_recipe(ada, "bread", vec![line(1, 500)], 2))
        .await
        .expect("bread");
    for recipe in [pancakes, bread] {
        store
            .add(RecipeList::ShoppingCart, bob, recipe)
            .await
            .expect("cart");
    }

    let lines = store.shopping_list_lines(bob).await.expect("lines");
    let flour: u32 = lines
        .iter()
        .filter(|line| line.name == "flour")
        .map(|line| line.amount)
        .sum();
    assert_eq!(lines.len(), 3);
    assert_eq!(flour, 700);
    assert!(store.shopping_list_lines(ada).await.expect("empty").is_empty());
}
