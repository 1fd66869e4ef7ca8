//! Tests for the domain user model.

use super::*;
use rstest::{fixture, rstest};

#[fixture]
fn profile() -> UserProfileFields {
    UserProfileFields::try_from_parts("Ada@Example.COM", "ada", "Ada", "Lovelace")
        .expect("fixture profile is valid")
}

#[rstest]
fn email_is_normalised(profile: UserProfileFields) {
    assert_eq!(profile.email.as_ref(), "ada@example.com");
}

#[rstest]
#[case("", UserValidationError::EmptyEmail)]
#[case("   ", UserValidationError::EmptyEmail)]
#[case("no-at-sign", UserValidationError::InvalidEmail)]
#[case("a@b", UserValidationError::InvalidEmail)]
#[case("two words@example.com", UserValidationError::InvalidEmail)]
fn invalid_emails_are_rejected(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(Email::new(raw), Err(expected));
}

#[rstest]
fn overlong_email_is_rejected() {
    let raw = format!("{}@example.com", "a".repeat(EMAIL_MAX));
    assert_eq!(
        Email::new(raw),
        Err(UserValidationError::EmailTooLong { max: EMAIL_MAX })
    );
}

#[rstest]
#[case("ada")]
#[case("ada.lovelace+cook@home-1_2")]
fn valid_usernames_are_accepted(#[case] raw: &str) {
    assert_eq!(Username::new(raw).map(|u| u.to_string()), Ok(raw.to_owned()));
}

#[rstest]
#[case("", UserValidationError::EmptyUsername)]
#[case("bad name", UserValidationError::UsernameInvalidCharacters)]
#[case("semi;colon", UserValidationError::UsernameInvalidCharacters)]
#[case("me", UserValidationError::ReservedUsername)]
#[case("ME", UserValidationError::ReservedUsername)]
fn invalid_usernames_are_rejected(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(Username::new(raw), Err(expected));
}

#[rstest]
fn overlong_username_is_rejected() {
    assert_eq!(
        Username::new("a".repeat(USERNAME_MAX + 1)),
        Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX })
    );
}

#[rstest]
fn names_may_be_empty() {
    let name = PersonName::new("  ").expect("blank names are allowed");
    assert_eq!(name.as_ref(), "");
}

#[rstest]
#[case("short1", UserValidationError::PasswordTooShort { min: PASSWORD_MIN })]
#[case("1234567890", UserValidationError::PasswordNumeric)]
fn weak_passwords_are_rejected(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(Password::new(raw), Err(expected));
}

#[rstest]
fn password_debug_is_redacted() {
    let password = Password::new("correct horse").expect("strong password");
    assert_eq!(format!("{password:?}"), "Password(***)");
    assert_eq!(password.expose(), "correct horse");
}

#[rstest]
fn profile_errors_name_the_field() {
    let (field, err) = UserProfileFields::try_from_parts("ada@example.com", "bad name", "", "")
        .expect_err("username is invalid");
    assert_eq!(field, "username");
    assert_eq!(err.code(), "invalid_format");
}

#[rstest]
fn user_exposes_components(profile: UserProfileFields) {
    let id = UserId::new(7).expect("valid id");
    let user = User::new(id, profile, true);
    assert_eq!(user.id(), id);
    assert_eq!(user.username().as_ref(), "ada");
    assert_eq!(user.first_name().as_ref(), "Ada");
    assert_eq!(user.last_name().as_ref(), "Lovelace");
    assert!(user.is_admin());
}
