//! Interactive browser.
//!
//! Shows whatever page the navigator currently points at, lets the user
//! act on it through menus, and lets the screens decide where to go next.
//! Screen failures are shown inline and never end the session.

use std::io::{self, IsTerminal};
use std::path::Path;

use dialoguer::{Confirm, Input, Select};
use tracing::debug;

use eventual_core::screen::countries::{
    CountriesHomeScreen, CountriesViewScreen, CountryCreateScreen,
};
use eventual_core::screen::event_create::{EventCreateScreen, EventForm};
use eventual_core::screen::event_edit::EventEditScreen;
use eventual_core::screen::event_view::{EventViewScreen, ViewState};
use eventual_core::screen::events_main::EventsMainScreen;
use eventual_core::screen::login::{LoginScreen, LogoutScreen};
use eventual_core::{AppContext, ImageFile, Route, ScreenError, time};

use crate::cli::{BrowseArgs, GlobalOpts};
use crate::error::CliError;
use crate::output::{self, Painter};

use super::users::profile_card;
use super::{Runtime, util};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub async fn handle(rt: &Runtime, args: BrowseArgs, global: &GlobalOpts) -> Result<(), CliError> {
    if !io::stdin().is_terminal() {
        return Err(CliError::Validation {
            field: "browse".into(),
            reason: "needs an interactive terminal".into(),
        });
    }
    let start = Route::from_path(&args.path).ok_or_else(|| CliError::Validation {
        field: "path".into(),
        reason: format!("no page at '{}'", args.path),
    })?;
    if start != Route::Home {
        rt.ctx.navigate(start);
    }

    let mut browser = Browser {
        ctx: rt.ctx.clone(),
        painter: Painter::new(&global.color),
        home: EventsMainScreen::new(rt.ctx.clone()),
    };

    loop {
        let route = rt.history.current();
        debug!(%route, "showing page");
        println!("\n{}", output::header(browser.painter, browser.ctx.session.user().as_ref()));

        let flow = match route {
            Route::Home => browser.home().await?,
            Route::EventCreate => browser.event_create().await?,
            Route::EventView(id) => browser.event_view(&id).await?,
            Route::EventEdit(_) => browser.event_edit().await?,
            Route::Login => browser.login().await?,
            Route::Logout => {
                LogoutScreen::run(&browser.ctx).await;
                Flow::Continue
            }
            Route::CountriesHome => browser.countries_home().await?,
            Route::CountriesView => browser.countries_view().await?,
            Route::CountriesCreate => browser.country_create().await?,
            // Never current: `Back` pops instead of being pushed.
            Route::Back => {
                browser.ctx.navigate(Route::Home);
                Flow::Continue
            }
        };

        println!("{}", output::footer(browser.painter));
        if flow == Flow::Quit {
            return Ok(());
        }
    }
}

// ── Prompts ─────────────────────────────────────────────────────────

/// Pick one entry; Esc picks nothing.
fn menu<A: Copy>(prompt: &str, entries: &[(String, A)]) -> Result<Option<A>, CliError> {
    let labels: Vec<&str> = entries.iter().map(|(label, _)| label.as_str()).collect();
    let picked = Select::new()
        .with_prompt(prompt)
        .items(&labels)
        .default(0)
        .interact_opt()
        .map_err(util::prompt_err)?;
    Ok(picked.and_then(|i| entries.get(i)).map(|(_, action)| *action))
}

fn entry<A>(label: &str, action: A) -> (String, A) {
    (label.to_owned(), action)
}

fn ask(prompt: &str, default: &str) -> Result<String, CliError> {
    let mut input = Input::<String>::new().with_prompt(prompt);
    if !default.is_empty() {
        input = input.default(default.to_owned());
    }
    input.interact_text().map_err(util::prompt_err)
}

fn ask_timestamp(default: &str) -> Result<String, CliError> {
    let mut input = Input::<String>::new()
        .with_prompt("When (dd/mm/YYYY HH:MM)")
        .validate_with(|raw: &String| {
            if time::is_input_format(raw) {
                Ok(())
            } else {
                Err("expected dd/mm/YYYY HH:MM")
            }
        });
    if !default.is_empty() {
        input = input.default(default.to_owned());
    }
    input.interact_text().map_err(util::prompt_err)
}

fn prompt_event_form(current: &EventForm) -> Result<EventForm, CliError> {
    Ok(EventForm {
        name: ask("Name", &current.name)?,
        timestamp: ask_timestamp(&current.timestamp)?,
        location: ask("Where", &current.location)?,
        image_url: current.image_url.clone(),
    })
}

/// Ask for an image file; empty input means none.
fn ask_image(painter: Painter) -> Result<Option<ImageFile>, CliError> {
    let raw: String = Input::new()
        .with_prompt("Image file (empty for none)")
        .allow_empty(true)
        .interact_text()
        .map_err(util::prompt_err)?;
    if raw.trim().is_empty() {
        return Ok(None);
    }
    match util::read_image(Path::new(raw.trim())) {
        Ok(image) => Ok(Some(image)),
        Err(e) => {
            println!("{}", painter.error(&format!("Cannot read {raw}: {e}")));
            Ok(None)
        }
    }
}

// ── Pages ───────────────────────────────────────────────────────────

struct Browser {
    ctx: AppContext,
    painter: Painter,
    /// Kept across visits so search results survive a detour.
    home: EventsMainScreen,
}

#[derive(Debug, Clone, Copy)]
enum HomeAction {
    Search,
    Open,
    Create,
    Countries,
    SignIn,
    Account,
    Quit,
}

#[derive(Debug, Clone, Copy)]
enum ViewAction {
    Edit,
    Delete,
    Back,
    Quit,
}

#[derive(Debug, Clone, Copy)]
enum FormAction {
    Retry,
    Back,
}

#[derive(Debug, Clone, Copy)]
enum CountriesAction {
    Picture,
    Add,
    SignIn,
    Home,
}

#[derive(Debug, Clone, Copy)]
enum AccountAction {
    Profile,
    Home,
    SignOut,
    Close,
}

impl Browser {
    fn show_error(&self, err: ScreenError) {
        println!("{}", self.painter.error(&err.message()));
    }

    // ── Home ────────────────────────────────────────────────────────

    async fn home(&mut self) -> Result<Flow, CliError> {
        println!("{}", self.painter.title("Events"));
        if let Some(err) = self.home.state().error() {
            self.show_error(err);
        }
        if !self.home.events().is_empty() {
            println!("{}", output::render_table(&output::event_rows(self.home.events())));
            println!("{}", output::map_summary(self.home.map()));
        }

        let session = self.ctx.session.user();
        let mut entries = vec![entry("Search events near an address", HomeAction::Search)];
        if !self.home.events().is_empty() {
            entries.push(entry("Open an event", HomeAction::Open));
        }
        entries.push(entry("Publish an event", HomeAction::Create));
        entries.push(entry("Visited countries", HomeAction::Countries));
        match session {
            Some(ref s) => {
                let name = s.display_name.as_deref().unwrap_or(&s.email);
                entries.push((format!("{name} ▾"), HomeAction::Account));
            }
            None => entries.push(entry("Sign in", HomeAction::SignIn)),
        }
        entries.push(entry("Quit", HomeAction::Quit));

        match menu("What next?", &entries)? {
            Some(HomeAction::Search) => {
                self.home.address = ask("Address", &self.home.address)?;
                if let Err(e) = self.home.search().await {
                    debug!(error = %e, "search failed");
                } else if self.home.events().is_empty() {
                    println!("{}", self.painter.muted("No events around there yet."));
                }
            }
            Some(HomeAction::Open) => {
                let entries: Vec<(String, usize)> = self
                    .home
                    .events()
                    .iter()
                    .enumerate()
                    .map(|(i, e)| (format!("{}  ({})", e.name, e.location), i))
                    .collect();
                if let Some(index) = menu("Which event?", &entries)? {
                    self.home.select(index);
                }
            }
            Some(HomeAction::Create) => self.home.create(),
            Some(HomeAction::Countries) => self.ctx.navigate(Route::CountriesHome),
            Some(HomeAction::SignIn) => self.ctx.navigate(Route::Login),
            Some(HomeAction::Account) => self.profile_dropdown().await?,
            Some(HomeAction::Quit) => return Ok(Flow::Quit),
            None => {}
        }
        Ok(Flow::Continue)
    }

    /// The signed-in user's menu: profile, home, sign out.
    async fn profile_dropdown(&self) -> Result<(), CliError> {
        let Some(session) = self.ctx.session.user() else {
            return Ok(());
        };
        match self.ctx.api.get_user(&session.backend_user_id).await {
            Ok(user) => {
                println!("{}", self.painter.title(&user.name));
                if !user.profile_picture.is_empty() {
                    println!("{}", self.painter.muted(&user.profile_picture));
                }
            }
            // Without the record the dropdown is not shown at all.
            Err(e) => {
                debug!(error = %e, "profile dropdown hidden");
                return Ok(());
            }
        }

        let entries = [
            entry("View profile", AccountAction::Profile),
            entry("Home", AccountAction::Home),
            entry("Sign out", AccountAction::SignOut),
            entry("Close", AccountAction::Close),
        ];
        match menu("Account", &entries)? {
            Some(AccountAction::Profile) => {
                match self.ctx.api.user_profile(&session.backend_user_id).await {
                    Ok(profile) => println!("{}", profile_card(&profile)),
                    Err(e) => println!("{}", self.painter.error(&e.to_string())),
                }
            }
            Some(AccountAction::Home) => self.ctx.navigate(Route::Home),
            Some(AccountAction::SignOut) => self.ctx.navigate(Route::Logout),
            Some(AccountAction::Close) | None => {}
        }
        Ok(())
    }

    // ── Events ──────────────────────────────────────────────────────

    async fn event_view(&self, id: &str) -> Result<Flow, CliError> {
        let mut screen = EventViewScreen::new(self.ctx.clone(), id);
        let loaded = match screen.load().await {
            ViewState::Failed(e) => {
                self.show_error(*e);
                false
            }
            _ => true,
        };

        let mut entries = Vec::new();
        if loaded {
            if let Some(event) = screen.event() {
                println!("{}", output::event_card(event));
            }
            if let Some(view) = screen.map() {
                println!("{}", output::map_summary(&view));
            }
            entries.push(entry("Edit", ViewAction::Edit));
            entries.push(entry("Delete", ViewAction::Delete));
        }
        entries.push(entry("Back", ViewAction::Back));
        entries.push(entry("Quit", ViewAction::Quit));

        match menu("Event", &entries)? {
            Some(ViewAction::Edit) => screen.edit(),
            Some(ViewAction::Delete) => {
                screen.request_delete();
                let sure = Confirm::new()
                    .with_prompt("Delete this event? This cannot be undone.")
                    .default(false)
                    .interact()
                    .map_err(util::prompt_err)?;
                if sure {
                    if let Err(e) = screen.confirm_delete().await {
                        self.show_error(e);
                    }
                } else {
                    screen.cancel_delete();
                }
            }
            Some(ViewAction::Back) => screen.back(),
            Some(ViewAction::Quit) => return Ok(Flow::Quit),
            None => {}
        }
        Ok(Flow::Continue)
    }

    async fn event_create(&self) -> Result<Flow, CliError> {
        println!("{}", self.painter.title("Publish an event"));
        let mut screen = EventCreateScreen::new(self.ctx.clone());
        screen.form = prompt_event_form(&EventForm::default())?;
        if let Some(image) = ask_image(self.painter)? {
            if let Err(e) = screen.attach_image(image).await {
                self.show_error(e);
            }
        }
        match screen.submit().await {
            Ok(event) => println!("{}", self.painter.ok(&format!("Published '{}'", event.name))),
            Err(e) => {
                self.show_error(e);
                self.retry_or_back()?;
            }
        }
        Ok(Flow::Continue)
    }

    async fn event_edit(&self) -> Result<Flow, CliError> {
        let Some(mut screen) = EventEditScreen::open(self.ctx.clone()) else {
            return Ok(Flow::Continue);
        };
        println!(
            "{}",
            self.painter.title(&format!("Editing '{}'", screen.original().name))
        );
        screen.form = prompt_event_form(&screen.form)?;
        if let Some(image) = ask_image(self.painter)? {
            if let Err(e) = screen.attach_image(image).await {
                self.show_error(e);
            }
        }
        match screen.submit().await {
            Ok(event) => println!("{}", self.painter.ok(&format!("Saved '{}'", event.name))),
            Err(e) => {
                self.show_error(e);
                self.retry_or_back()?;
            }
        }
        Ok(Flow::Continue)
    }

    /// After a failed submit: stay on the form, or leave it.
    fn retry_or_back(&self) -> Result<(), CliError> {
        let entries = [
            entry("Try again", FormAction::Retry),
            entry("Back", FormAction::Back),
        ];
        if let Some(FormAction::Back) | None = menu("", &entries)? {
            self.ctx.navigate(Route::Back);
        }
        Ok(())
    }

    // ── Session ─────────────────────────────────────────────────────

    async fn login(&self) -> Result<Flow, CliError> {
        let screen = LoginScreen::new(self.ctx.clone());
        if let Some(session) = screen.session() {
            let name = session.display_name.unwrap_or(session.email);
            println!("{}", self.painter.ok(&format!("Welcome back, {name}")));
            screen.back();
            return Ok(Flow::Continue);
        }

        println!("{}", self.painter.title("Sign in"));
        let entries = [
            entry("Continue with Google", Some("google")),
            entry("Continue with Facebook", Some("facebook")),
            entry("Back", None),
        ];
        match menu("Provider", &entries)?.flatten() {
            Some(provider) => {
                if screen.login(provider).await.is_none() {
                    println!("{}", self.painter.error("Sign-in failed"));
                }
            }
            None => screen.back(),
        }
        Ok(Flow::Continue)
    }

    // ── Countries ───────────────────────────────────────────────────

    async fn countries_home(&self) -> Result<Flow, CliError> {
        let screen = CountriesHomeScreen::open(self.ctx.clone());
        if self.ctx.session.is_logged() {
            return Ok(Flow::Continue);
        }

        println!("{}", self.painter.title("Visited countries"));
        println!("Sign in to keep a map of the countries you have visited.");
        let entries = [
            entry("Sign in with Google", CountriesAction::SignIn),
            entry("Home", CountriesAction::Home),
        ];
        match menu("", &entries)? {
            Some(CountriesAction::SignIn) => {
                if !screen.login().await {
                    println!("{}", self.painter.error("Sign-in failed"));
                }
            }
            Some(CountriesAction::Home) | None => self.ctx.navigate(Route::Home),
            Some(_) => {}
        }
        Ok(Flow::Continue)
    }

    async fn countries_view(&self) -> Result<Flow, CliError> {
        println!("{}", self.painter.title("Visited countries"));
        let mut screen = CountriesViewScreen::new(self.ctx.clone());
        if let Err(e) = screen.load().await {
            self.show_error(e);
        }
        if !screen.countries().is_empty() {
            println!("{}", output::map_summary(&screen.map()));
        }

        let mut entries = Vec::new();
        if !screen.countries().is_empty() {
            entries.push(entry("Show a country's picture", CountriesAction::Picture));
        }
        entries.push(entry("Add a country", CountriesAction::Add));
        entries.push(entry("Home", CountriesAction::Home));

        match menu("", &entries)? {
            Some(CountriesAction::Picture) => {
                let names: Vec<(String, usize)> = screen
                    .countries()
                    .iter()
                    .enumerate()
                    .map(|(i, c)| (c.name.clone(), i))
                    .collect();
                if let Some(index) = menu("Which country?", &names)? {
                    match screen.marker_click(index) {
                        Some(url) if !url.is_empty() => println!("{url}"),
                        _ => println!("{}", self.painter.muted("No picture for this country")),
                    }
                }
            }
            Some(CountriesAction::Add) => screen.create(),
            Some(CountriesAction::Home) | None => self.ctx.navigate(Route::Home),
            Some(CountriesAction::SignIn) => {}
        }
        Ok(Flow::Continue)
    }

    async fn country_create(&self) -> Result<Flow, CliError> {
        println!("{}", self.painter.title("Add a country"));
        let mut screen = CountryCreateScreen::new(self.ctx.clone());
        screen.name = ask("Country", "")?;
        if let Some(image) = ask_image(self.painter)? {
            if let Err(e) = screen.attach_image(image).await {
                self.show_error(e);
            }
        }
        match screen.submit().await {
            Ok(country) => println!("{}", self.painter.ok(&format!("Added {}", country.name))),
            Err(e) => {
                self.show_error(e);
                self.retry_or_back()?;
            }
        }
        Ok(Flow::Continue)
    }
}
