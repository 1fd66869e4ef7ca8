//! Validation coverage for recipe drafts and patches.

use super::*;
use rstest::{fixture, rstest};

const PNG: &str = "data:image/png;base64,aGVsbG8=";

#[fixture]
fn input() -> RecipeInput {
    RecipeInput {
        name: Some("  Pancakes ".to_owned()),
        text: Some("Mix and fry.".to_owned()),
        cooking_time: Some(20),
        image: Some(PNG.to_owned()),
        ingredients: Some(vec![
            IngredientInput { id: 1, amount: 200 },
            IngredientInput { id: 2, amount: 2 },
        ]),
        tags: Some(vec![1, 3]),
    }
}

#[rstest]
fn complete_input_becomes_a_draft(input: RecipeInput) {
    let draft = RecipeDraft::try_from(input).expect("input is valid");
    assert_eq!(draft.name.as_ref(), "Pancakes");
    assert_eq!(draft.cooking_time.minutes(), 20);
    assert_eq!(draft.ingredients.len(), 2);
    assert_eq!(
        draft.tags,
        vec![TagId::from_row(1), TagId::from_row(3)]
    );
}

#[rstest]
#[case::name(|i: &mut RecipeInput| i.name = None, "name")]
#[case::text(|i: &mut RecipeInput| i.text = None, "text")]
#[case::cooking_time(|i: &mut RecipeInput| i.cooking_time = None, "cooking_time")]
#[case::image(|i: &mut RecipeInput| i.image = None, "image")]
#[case::ingredients(|i: &mut RecipeInput| i.ingredients = None, "ingredients")]
#[case::tags(|i: &mut RecipeInput| i.tags = None, "tags")]
fn drafts_require_every_field(
    mut input: RecipeInput,
    #[case] strip: fn(&mut RecipeInput),
    #[case] field: &str,
) {
    strip(&mut input);
    let err = RecipeDraft::try_from(input).expect_err("field is missing");
    assert_eq!(err.code(), "missing_field");
    assert_eq!(err.field(), field);
}

#[rstest]
fn empty_ingredients_are_rejected(mut input: RecipeInput) {
    input.ingredients = Some(Vec::new());
    assert_eq!(
        RecipeDraft::try_from(input),
        Err(RecipeValidationError::NoIngredients)
    );
}

#[rstest]
fn duplicate_ingredients_are_rejected(mut input: RecipeInput) {
    input.ingredients = Some(vec![
        IngredientInput { id: 4, amount: 1 },
        IngredientInput { id: 4, amount: 3 },
    ]);
    let err = RecipeDraft::try_from(input).expect_err("duplicate ingredient");
    assert_eq!(err, RecipeValidationError::DuplicateIngredient { index: 1, id: 4 });
    assert_eq!(err.index(), Some(1));
}

#[rstest]
#[case(0)]
#[case(-5)]
#[case(32_768)]
fn out_of_range_amounts_are_rejected(mut input: RecipeInput, #[case] amount: i64) {
    input.ingredients = Some(vec![IngredientInput { id: 1, amount }]);
    let err = RecipeDraft::try_from(input).expect_err("amount out of range");
    assert_eq!(err.code(), "out_of_range");
    assert_eq!(err.field(), "ingredients");
}

#[rstest]
fn non_positive_ids_are_rejected(mut input: RecipeInput) {
    input.tags = Some(vec![2, 0]);
    let err = RecipeDraft::try_from(input).expect_err("invalid tag id");
    assert_eq!(
        err,
        RecipeValidationError::InvalidId {
            field: "tags",
            index: 1,
            value: 0
        }
    );
}

#[rstest]
fn duplicate_tags_are_rejected(mut input: RecipeInput) {
    input.tags = Some(vec![2, 2]);
    assert_eq!(
        RecipeDraft::try_from(input),
        Err(RecipeValidationError::DuplicateTag { index: 1, id: 2 })
    );
}

#[rstest]
#[case(0)]
#[case(40_000)]
fn cooking_time_bounds(mut input: RecipeInput, #[case] minutes: i64) {
    input.cooking_time = Some(minutes);
    assert_eq!(
        RecipeDraft::try_from(input),
        Err(RecipeValidationError::CookingTimeOutOfRange { max: QUANTITY_MAX })
    );
}

#[rstest]
fn blank_text_is_rejected(mut input: RecipeInput) {
    input.text = Some("   ".to_owned());
    assert_eq!(
        RecipeDraft::try_from(input),
        Err(RecipeValidationError::EmptyText)
    );
}

#[rstest]
fn bad_image_is_reported_on_image_field(mut input: RecipeInput) {
    input.image = Some("http://example.com/cat.png".to_owned());
    let err = RecipeDraft::try_from(input).expect_err("image is not a data url");
    assert_eq!(err.field(), "image");
}

#[rstest]
fn empty_patch_changes_nothing() {
    let patch = RecipePatch::try_from(RecipeInput::default()).expect("empty patch is valid");
    assert_eq!(patch, RecipePatch::default());
}

#[rstest]
fn patch_applies_collection_rules() {
    let input = RecipeInput {
        tags: Some(Vec::new()),
        ..RecipeInput::default()
    };
    assert_eq!(
        RecipePatch::try_from(input),
        Err(RecipeValidationError::NoTags)
    );
}

#[rstest]
fn patch_keeps_supplied_fields() {
    let input = RecipeInput {
        cooking_time: Some(5),
        ..RecipeInput::default()
    };
    let patch = RecipePatch::try_from(input).expect("valid patch");
    assert_eq!(patch.cooking_time.map(CookingTime::minutes), Some(5));
    assert!(patch.name.is_none());
}
