//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. When a
//! migration changes the schema, update this file alongside it; the
//! `diesel print-schema` command can regenerate it from a live database.

diesel::table! {
    /// Registered accounts.
    ///
    /// `email` and `username` carry unique constraints named
    /// `users_email_key` and `users_username_key`.
    users (id) {
        id -> Int8,
        email -> Varchar,
        username -> Varchar,
        first_name -> Varchar,
        last_name -> Varchar,
        password_hash -> Varchar,
        is_admin -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Recipe tags, seeded by migrations.
    tags (id) {
        id -> Int8,
        name -> Varchar,
        color -> Varchar,
        slug -> Varchar,
    }
}

diesel::table! {
    /// Ingredient catalogue; `(name, measurement_unit)` is unique.
    ingredients (id) {
        id -> Int8,
        name -> Varchar,
        measurement_unit -> Varchar,
    }
}

diesel::table! {
    recipes (id) {
        id -> Int8,
        author_id -> Int8,
        name -> Varchar,
        text -> Text,
        cooking_time -> Int4,
        image_path -> Varchar,
        published_at -> Timestamptz,
    }
}

diesel::table! {
    /// Ingredient lines of a recipe. `position` preserves submission order.
    recipe_ingredients (recipe_id, ingredient_id) {
        recipe_id -> Int8,
        ingredient_id -> Int8,
        amount -> Int4,
        position -> Int4,
    }
}

diesel::table! {
    recipe_tags (recipe_id, tag_id) {
        recipe_id -> Int8,
        tag_id -> Int8,
        position -> Int4,
    }
}

diesel::table! {
    favorites (user_id, recipe_id) {
        user_id -> Int8,
        recipe_id -> Int8,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    shopping_cart_items (user_id, recipe_id) {
        user_id -> Int8,
        recipe_id -> Int8,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Follower edges; both columns reference `users`.
    subscriptions (user_id, author_id) {
        user_id -> Int8,
        author_id -> Int8,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(recipes -> users (author_id));
diesel::joinable!(recipe_ingredients -> recipes (recipe_id));
diesel::joinable!(recipe_ingredients -> ingredients (ingredient_id));
diesel::joinable!(recipe_tags -> recipes (recipe_id));
diesel::joinable!(recipe_tags -> tags (tag_id));
diesel::joinable!(favorites -> recipes (recipe_id));
diesel::joinable!(shopping_cart_items -> recipes (recipe_id));

diesel::allow_tables_to_appear_in_same_query!(
    favorites,
    ingredients,
    recipe_ingredients,
    recipe_tags,
    recipes,
    shopping_cart_items,
    subscriptions,
    tags,
    users,
);
