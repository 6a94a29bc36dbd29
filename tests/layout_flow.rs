use crux_core::App as _;
use crux_core::testing::AppTester;

use paydesk_core::capabilities::{KvOperation, KvOutput};
use paydesk_core::data;
use paydesk_core::event::Event;
use paydesk_core::layout::{
    RegionId, SIDEBAR_WIDTH_COLLAPSED_PX, SIDEBAR_WIDTH_DRAWER_PX, SIDEBAR_WIDTH_EXPANDED_PX,
};
use paydesk_core::session::Secret;
use paydesk_core::{get_current_time_ms, App, Effect, Model, ToastKind};

const HOUR_MS: u64 = 60 * 60 * 1000;

fn signed_in_model(width: u32, role: &str) -> Model {
    let app = AppTester::<App, _>::default();
    let mut model = Model::default();
    app.update(
        Event::Started {
            viewport_width: width,
        },
        &mut model,
    );
    model.session.access_token = Some(Secret::new("tok-1"));
    model.session.token_expires_ms = Some(get_current_time_ms() + HOUR_MS);
    model.session.role = Some(role.to_string());
    model.session_loaded = true;
    model
}

#[test]
fn startup_requests_the_whole_session_and_picks_the_mode() {
    let app = AppTester::<App, _>::default();
    let mut model = Model::default();

    let update = app.update(
        Event::Started {
            viewport_width: 1440,
        },
        &mut model,
    );
    assert!(!model.layout.mobile);
    assert!(model.layout.sidebar_open);
    assert!(!model.session_loaded);

    // One storage read covering every session slot, in a fixed order.
    let reads: Vec<_> = update
        .effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::Kv(request) => match &request.operation {
                KvOperation::GetMulti { keys } => Some(keys.clone()),
                KvOperation::Set { .. } => None,
            },
            _ => None,
        })
        .collect();
    assert_eq!(
        reads,
        vec![vec![
            "token",
            "refreshToken",
            "tokenExpires",
            "refreshTokenExpires",
            "role",
            "name",
            "email",
            "roleId",
        ]]
    );

    // The storage answer signs the user in and fills the header.
    let now = get_current_time_ms();
    let values = vec![
        Some("tok-1".to_string()),
        Some("refresh-9".to_string()),
        Some((now + HOUR_MS).to_string()),
        Some((now + 2 * HOUR_MS).to_string()),
        Some("SuperAdmin".to_string()),
        Some("Priya Sharma".to_string()),
        Some("priya@example.com".to_string()),
        Some("1".to_string()),
    ];
    app.update(
        Event::SessionLoaded(Box::new(Ok(KvOutput::Values(values)))),
        &mut model,
    );
    assert!(model.session_loaded);
    assert!(model.session.signed_in());

    let view = App.view(&model);
    assert_eq!(view.session.name, "Priya Sharma");
    assert!(view.session.signed_in);
    assert!(view.nav.iter().any(|item| item.route == data::ADMIN_ROUTE));
}

#[test]
fn startup_with_empty_storage_stays_signed_out() {
    let app = AppTester::<App, _>::default();
    let mut model = Model::default();
    app.update(
        Event::Started {
            viewport_width: 1440,
        },
        &mut model,
    );
    app.update(
        Event::SessionLoaded(Box::new(Ok(KvOutput::Values(vec![None; 8])))),
        &mut model,
    );
    assert!(model.session_loaded);
    assert!(!model.session.signed_in());

    let view = App.view(&model);
    assert_eq!(view.session.name, data::FALLBACK_USER_NAME);
    assert!(view.nav.iter().all(|item| item.route != data::ADMIN_ROUTE));
}

#[test]
fn drawer_opens_and_closes_on_mobile() {
    let app = AppTester::<App, _>::default();
    let mut model = signed_in_model(390, "CallCenterManager");
    assert!(model.layout.mobile);
    assert_eq!(App.view(&model).layout.sidebar_width_px, 0);

    app.update(Event::MenuToggled, &mut model);
    assert!(model.layout.mobile_menu_open);
    assert_eq!(App.view(&model).layout.sidebar_width_px, SIDEBAR_WIDTH_DRAWER_PX);

    // Presses inside the drawer leave it alone; anything else dismisses it.
    app.update(
        Event::PointerPressed {
            region: Some(RegionId::Sidebar),
        },
        &mut model,
    );
    assert!(model.layout.mobile_menu_open);

    app.update(
        Event::PointerPressed {
            region: Some(RegionId::MainContent),
        },
        &mut model,
    );
    assert!(!model.layout.mobile_menu_open);

    app.update(Event::MenuToggled, &mut model);
    app.update(Event::PointerPressed { region: None }, &mut model);
    assert!(!model.layout.mobile_menu_open);
}

#[test]
fn desktop_rail_collapses_on_main_content_press() {
    let app = AppTester::<App, _>::default();
    let mut model = signed_in_model(1440, "CallCenterManager");
    assert_eq!(
        App.view(&model).layout.sidebar_width_px,
        SIDEBAR_WIDTH_EXPANDED_PX
    );

    app.update(
        Event::PointerPressed {
            region: Some(RegionId::MainContent),
        },
        &mut model,
    );
    assert!(!model.layout.sidebar_open);
    assert_eq!(
        App.view(&model).layout.sidebar_width_px,
        SIDEBAR_WIDTH_COLLAPSED_PX
    );

    // A second press is not a toggle.
    app.update(
        Event::PointerPressed {
            region: Some(RegionId::MainContent),
        },
        &mut model,
    );
    assert!(!model.layout.sidebar_open);

    app.update(Event::MenuToggled, &mut model);
    assert!(model.layout.sidebar_open);
}

#[test]
fn mode_flips_reset_to_that_modes_default() {
    let app = AppTester::<App, _>::default();
    let mut model = signed_in_model(1440, "CallCenterManager");

    app.update(Event::ViewportResized { width: 800 }, &mut model);
    assert!(model.layout.mobile);
    assert!(!model.layout.mobile_menu_open);

    app.update(Event::MenuToggled, &mut model);
    assert!(model.layout.mobile_menu_open);

    // Widths within a mode leave the user's choice alone.
    app.update(Event::ViewportResized { width: 900 }, &mut model);
    assert!(model.layout.mobile_menu_open);

    app.update(Event::ViewportResized { width: 1300 }, &mut model);
    assert!(!model.layout.mobile);
    assert!(model.layout.sidebar_open);
    assert!(!model.layout.mobile_menu_open);
}

#[test]
fn navigation_closes_the_drawer_on_mobile() {
    let app = AppTester::<App, _>::default();
    let mut model = signed_in_model(390, "CallCenterManager");
    app.update(Event::MenuToggled, &mut model);
    assert!(model.layout.mobile_menu_open);

    app.update(
        Event::NavigateTo(data::TRANSACTIONS_ROUTE.to_string()),
        &mut model,
    );
    assert_eq!(model.route, data::TRANSACTIONS_ROUTE);
    assert!(!model.layout.mobile_menu_open);
}

#[test]
fn bare_root_redirects_home() {
    let app = AppTester::<App, _>::default();
    let mut model = signed_in_model(1440, "CallCenterManager");
    app.update(
        Event::NavigateTo(data::TRANSACTIONS_ROUTE.to_string()),
        &mut model,
    );

    app.update(Event::NavigateTo("/".to_string()), &mut model);
    assert_eq!(model.route, data::HOME_ROUTE);
    assert!(model.active_toast.is_none());
}

#[test]
fn profile_route_collapses_the_chrome() {
    let app = AppTester::<App, _>::default();
    let mut model = signed_in_model(1440, "CallCenterManager");
    assert!(model.layout.sidebar_open);

    app.update(
        Event::NavigateTo(data::PROFILE_ROUTE.to_string()),
        &mut model,
    );
    assert_eq!(model.route, data::PROFILE_ROUTE);
    assert!(!model.layout.sidebar_open);
}

#[test]
fn admin_route_is_denied_below_admin_tier() {
    let app = AppTester::<App, _>::default();
    let mut model = signed_in_model(1440, "Technician");

    app.update(Event::NavigateTo(data::ADMIN_ROUTE.to_string()), &mut model);
    assert_eq!(model.route, data::HOME_ROUTE);

    let toast = model.active_toast.as_ref().unwrap();
    assert_eq!(toast.kind, ToastKind::Warning);
    assert_eq!(toast.message, data::UNAUTHORIZED_ROUTE_MESSAGE);

    // An admin sails through.
    let mut model = signed_in_model(1440, "SuperAdmin");
    app.update(Event::NavigateTo(data::ADMIN_ROUTE.to_string()), &mut model);
    assert_eq!(model.route, data::ADMIN_ROUTE);
    assert!(model.active_toast.is_none());
}

#[test]
fn signed_out_sessions_cannot_navigate() {
    let app = AppTester::<App, _>::default();
    let mut model = Model::default();
    app.update(
        Event::Started {
            viewport_width: 1440,
        },
        &mut model,
    );
    app.update(
        Event::SessionLoaded(Box::new(Ok(KvOutput::Values(vec![None; 8])))),
        &mut model,
    );

    app.update(
        Event::NavigateTo(data::TRANSACTIONS_ROUTE.to_string()),
        &mut model,
    );
    assert_eq!(model.route, data::HOME_ROUTE);
    assert_eq!(
        model.active_toast.as_ref().map(|t| t.message.as_str()),
        Some(data::UNAUTHORIZED_ROUTE_MESSAGE)
    );
}
