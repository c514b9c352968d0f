//! Profile, settings, help and account screens

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{immediate_context, wait_until};
use gymlog_screens::screens::account::{LOGIN_FAILED, REGISTRATION_FAILED, RESET_FAILED};
use gymlog_screens::screens::{
    AccountScreen, ActiveWorkoutScreen, HelpScreen, ProfileScreen, SettingsScreen, WorkoutTarget,
};
use gymlog_screens::{Screen, ScreenContext, ScreenError};
use libgymlog::auth::{AuthService, InMemoryAuthProvider};
use libgymlog::preferences::AppTheme;
use libgymlog::views::current;
use libgymlog::ScreenTimings;

#[tokio::test(start_paused = true)]
async fn test_profile_update_flashes_success() {
    let screen = ProfileScreen::new(ScreenContext::in_memory(ScreenTimings::default()));

    // Not loaded yet, so ignored
    screen.update_profile("Nobody", 1.0, 1.0);

    let state = wait_until(&screen, |s| !s.is_loading).await;
    assert_eq!(state.profile_data.as_ref().map(|p| p.name.as_str()), Some("Julia Oliveira"));
    assert!(!state.update_success);

    screen.update_profile("Ana Souza", 165.0, 62.5);
    let state = wait_until(&screen, |s| {
        s.update_success && s.profile_data.as_ref().is_some_and(|p| p.name == "Ana Souza")
    })
    .await;
    let profile = state.profile_data.expect("profile");
    assert_eq!(profile.name, "Ana Souza");
    assert_eq!((profile.height, profile.weight), (165.0, 62.5));

    tokio::time::sleep(Duration::from_millis(2100)).await;
    let state = screen.state();
    assert!(!state.update_success);
    assert_eq!(state.profile_data.map(|p| p.name), Some("Ana Souza".to_string()));
}

#[tokio::test(start_paused = true)]
async fn test_profile_second_save_restarts_success_flash() {
    let screen = ProfileScreen::new(ScreenContext::in_memory(ScreenTimings::default()));
    wait_until(&screen, |s| !s.is_loading).await;

    screen.update_profile("Ana Souza", 165.0, 62.5);
    wait_until(&screen, |s| s.update_success).await;

    tokio::time::sleep(Duration::from_millis(1500)).await;
    screen.update_profile("Ana Lima", 165.0, 61.0);
    wait_until(&screen, |s| {
        s.update_success && s.profile_data.as_ref().is_some_and(|p| p.name == "Ana Lima")
    })
    .await;

    // Past the first save's display window
    tokio::time::sleep(Duration::from_millis(1000)).await;
    assert!(screen.state().update_success);

    tokio::time::sleep(Duration::from_millis(1100)).await;
    assert!(!screen.state().update_success);
}

#[tokio::test(start_paused = true)]
async fn test_settings_write_through() -> anyhow::Result<()> {
    let (context, _) = immediate_context();
    let repository = context.repository.clone();
    let screen = SettingsScreen::new(context);

    let state = screen.state();
    assert!(!state.preferences.dark_mode);
    assert_eq!(state.preferences.app_theme, AppTheme::Default);

    screen.set_dark_mode(true).await?;
    screen.set_app_theme(AppTheme::Ocean).await?;
    screen.set_notifications_enabled(false).await?;
    let state = wait_until(&screen, |s| {
        s.preferences.dark_mode && s.preferences.app_theme == AppTheme::Ocean
    })
    .await;
    assert!(!state.preferences.notifications_enabled);

    screen.set_rest_timer_duration(90).await?;
    wait_until(&screen, |s| s.rest_timer_duration == Some(90)).await;

    screen.clear_favorites().await?;
    assert!(current(repository.favorite_routines()).await?.is_empty());
    assert!(screen.state().error_message.is_none());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_settings_rejects_zero_rest_timer() -> anyhow::Result<()> {
    let (context, _) = immediate_context();
    let screen = SettingsScreen::new(context.clone());
    wait_until(&screen, |s| s.rest_timer_duration == Some(60)).await;

    let outcome = screen.set_rest_timer_duration(0).await;
    assert!(matches!(outcome, Err(ScreenError::Service(_))));
    let state = screen.state();
    assert_eq!(state.rest_timer_duration, Some(60));
    assert!(state
        .error_message
        .as_deref()
        .is_some_and(|m| m.starts_with("Failed to update rest timer")));

    // Sessions still open with the previous length
    let workout = ActiveWorkoutScreen::start(context, WorkoutTarget::Custom).await?;
    assert_eq!(workout.rest_timer().state().total, 60);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_help_faq_expansion_toggles() {
    let (context, _) = immediate_context();
    let screen = HelpScreen::new(context);

    let state = screen.state();
    assert!(!state.faqs.is_empty());
    assert!(state.expanded_faq_ids.is_empty());

    screen.toggle_faq_expansion(1);
    screen.toggle_faq_expansion(2);
    assert_eq!(screen.state().expanded_faq_ids.into_iter().collect::<Vec<_>>(), vec![1, 2]);

    screen.toggle_faq_expansion(1);
    assert_eq!(screen.state().expanded_faq_ids.into_iter().collect::<Vec<_>>(), vec![2]);
}

#[tokio::test(start_paused = true)]
async fn test_help_support_message_confirmation_clears() {
    let screen = HelpScreen::new(ScreenContext::in_memory(ScreenTimings::default()));

    let blank = screen.send_support_message("Ana", "  ", "Timer stops early");
    assert!(matches!(blank, Err(ScreenError::InvalidInput(_))));
    assert!(!screen.state().support_message_sent);

    screen
        .send_support_message("Ana", "ana@example.com", "Timer stops early")
        .unwrap();
    assert!(screen.state().support_message_sent);

    tokio::time::sleep(Duration::from_millis(3100)).await;
    assert!(!screen.state().support_message_sent);
}

#[tokio::test(start_paused = true)]
async fn test_help_second_message_restarts_confirmation() {
    let screen = HelpScreen::new(ScreenContext::in_memory(ScreenTimings::default()));

    screen
        .send_support_message("Ana", "ana@example.com", "Timer stops early")
        .unwrap();
    tokio::time::sleep(Duration::from_millis(2000)).await;
    screen
        .send_support_message("Ana", "ana@example.com", "Still stops early")
        .unwrap();

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert!(screen.state().support_message_sent);

    tokio::time::sleep(Duration::from_millis(1600)).await;
    assert!(!screen.state().support_message_sent);
}

#[tokio::test]
async fn test_account_register_login_logout() -> anyhow::Result<()> {
    let (context, _) = immediate_context();
    let screen = AccountScreen::new(context);
    assert!(!screen.state().logged_in);

    assert!(!screen.login("ana@example.com", "secret").await?);
    assert_eq!(screen.state().error_message.as_deref(), Some(LOGIN_FAILED));

    assert!(screen.register("ana@example.com", "secret", "Ana").await?);
    let state = screen.state();
    assert!(state.logged_in);
    assert_eq!(state.user_name.as_deref(), Some("Ana"));
    assert!(state.error_message.is_none());

    assert!(!screen.register("ANA@example.com", "other", "Ana 2").await?);
    let state = screen.state();
    assert_eq!(state.error_message.as_deref(), Some(REGISTRATION_FAILED));
    assert!(state.logged_in);

    screen.logout();
    assert_eq!(screen.state(), Default::default());

    assert!(screen.login(" ana@example.com ", "secret").await?);
    assert!(screen.state().logged_in);
    Ok(())
}

#[tokio::test]
async fn test_account_rejects_blank_credentials() {
    let (context, _) = immediate_context();
    let screen = AccountScreen::new(context);

    assert!(matches!(
        screen.login("", "secret").await,
        Err(ScreenError::InvalidInput(_))
    ));
    assert!(matches!(
        screen.register("ana@example.com", "   ", "Ana").await,
        Err(ScreenError::InvalidInput(_))
    ));
    assert!(!screen.state().is_loading);
}

#[tokio::test]
async fn test_account_password_reset() -> anyhow::Result<()> {
    let provider = Arc::new(InMemoryAuthProvider::new());
    let (context, _) = immediate_context();
    let screen = AccountScreen::new(context.with_auth(AuthService::new(provider.clone())));

    assert!(!screen.reset_password("nobody@example.com").await?);
    assert_eq!(screen.state().error_message.as_deref(), Some(RESET_FAILED));

    screen.register("ana@example.com", "secret", "Ana").await?;
    screen.logout();
    assert!(screen.reset_password("ana@example.com").await?);
    assert!(screen.state().reset_email_sent);
    assert_eq!(provider.reset_requests(), vec!["ana@example.com".to_string()]);

    provider.set_outage(Some("service unavailable"));
    assert!(!screen.login("ana@example.com", "secret").await?);
    assert!(!screen.state().reset_email_sent);
    Ok(())
}
