use std::sync::Arc;

use cosmic::app::{Core, Task as CosmicTask};
use cosmic::widget::{button, icon, row, text};
use cosmic::{Application, Element, executor};
use tokio::sync::Mutex;

use crate::config::{APP_ID, TasklightConfig};
use crate::fl;
use crate::message::Message;
use crate::pages;
use tasklight::core::theme::Theme;
use tasklight::storage::FileStore;
use tasklight::store::{Snapshot, TodoStore};

/// Every store transaction runs under this lock, so writes reach the disk in
/// the order the lock is granted.
type SharedStore = Arc<Mutex<TodoStore<FileStore>>>;

pub struct Flags {
    pub config: TasklightConfig,
}

pub struct Tasklight {
    core: Core,
    config: TasklightConfig,
    store: SharedStore,
    device_theme: Theme,

    // Last snapshot the store handed back
    snapshot: Snapshot,

    // UI state
    input: String,
    search_input: String,
    notice: Option<String>,
}

impl Application for Tasklight {
    type Executor = executor::Default;
    type Flags = Flags;
    type Message = Message;

    const APP_ID: &'static str = APP_ID;

    fn core(&self) -> &Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut Core {
        &mut self.core
    }

    fn init(core: Core, flags: Self::Flags) -> (Self, CosmicTask<Self::Message>) {
        let config = flags.config;
        let device_theme = device_theme();

        let gateway = config.open_store();
        log::info!("Storing to-dos in {}", gateway.dir().display());
        let store = Arc::new(Mutex::new(TodoStore::new(gateway, device_theme)));

        let app = Self {
            core,
            config,
            store: Arc::clone(&store),
            device_theme,
            snapshot: Snapshot::default(),
            input: String::new(),
            search_input: String::new(),
            notice: None,
        };

        let load = CosmicTask::perform(
            async move { store.lock().await.load().await },
            |snapshot| cosmic::Action::App(Message::Loaded(snapshot)),
        );

        (app, load)
    }

    fn header_start(&self) -> Vec<Element<'_, Message>> {
        vec![text::title4(fl!("app-title")).into()]
    }

    fn header_end(&self) -> Vec<Element<'_, Message>> {
        // Sun while dark, moon while light: the icon names the mode you switch to.
        let theme_icon = if self.current_theme().is_dark() {
            "weather-clear-symbolic"
        } else {
            "weather-clear-night-symbolic"
        };

        vec![
            row()
                .spacing(4)
                .push(button::icon(icon::from_name(theme_icon)).on_press(Message::ToggleTheme))
                .into(),
        ]
    }

    fn update(&mut self, message: Message) -> CosmicTask<Message> {
        match message {
            Message::Loaded(snapshot) => {
                log::debug!(
                    "Loaded {} to-dos from {}",
                    snapshot.items.len(),
                    self.config.data_directory.display()
                );
                let theme = snapshot.theme.effective(self.device_theme);
                if self.apply(snapshot) {
                    return set_theme(theme);
                }
            }

            Message::Synced(snapshot) => {
                self.apply(snapshot);
            }

            Message::Added(snapshot, added) => {
                if added {
                    self.input.clear();
                }
                self.apply(snapshot);
            }

            Message::Deleted(snapshot, removed) => {
                if let Some(title) = removed {
                    self.notice = Some(fl!("todo-deleted", title = title));
                }
                self.apply(snapshot);
            }

            Message::ThemeChanged(snapshot, theme) => {
                if self.apply(snapshot) {
                    return set_theme(theme);
                }
            }

            Message::InputChanged(value) => {
                self.input = value;
            }

            Message::Submit => {
                let store = Arc::clone(&self.store);
                let title = self.input.clone();
                return CosmicTask::perform(
                    async move {
                        let mut guard = store.lock().await;
                        let added = match guard.add(title).await {
                            Ok(_) => true,
                            Err(e) => {
                                log::error!("Failed to save to-do list: {}", e);
                                false
                            }
                        };
                        (guard.snapshot(), added)
                    },
                    |(snapshot, added)| cosmic::Action::App(Message::Added(snapshot, added)),
                );
            }

            Message::ToggleDone(id) => {
                let store = Arc::clone(&self.store);
                return CosmicTask::perform(
                    async move {
                        let mut guard = store.lock().await;
                        if let Err(e) = guard.toggle(&id).await {
                            log::error!("Failed to save to-do list: {}", e);
                        }
                        guard.snapshot()
                    },
                    |snapshot| cosmic::Action::App(Message::Synced(snapshot)),
                );
            }

            Message::Delete(id) => {
                let store = Arc::clone(&self.store);
                return CosmicTask::perform(
                    async move {
                        let mut guard = store.lock().await;
                        let removed = match guard.delete(&id).await {
                            Ok(removed) => removed.map(|item| item.title),
                            Err(e) => {
                                log::error!("Failed to save to-do list: {}", e);
                                None
                            }
                        };
                        (guard.snapshot(), removed)
                    },
                    |(snapshot, removed)| cosmic::Action::App(Message::Deleted(snapshot, removed)),
                );
            }

            Message::SearchChanged(query) => {
                self.search_input = query.clone();
                let store = Arc::clone(&self.store);
                return CosmicTask::perform(
                    async move {
                        let mut guard = store.lock().await;
                        guard.search(query);
                        guard.snapshot()
                    },
                    |snapshot| cosmic::Action::App(Message::Synced(snapshot)),
                );
            }

            Message::ToggleTheme => {
                let store = Arc::clone(&self.store);
                return CosmicTask::perform(
                    async move {
                        let mut guard = store.lock().await;
                        let theme = guard.toggle_theme().await;
                        (guard.snapshot(), theme)
                    },
                    |(snapshot, theme)| cosmic::Action::App(Message::ThemeChanged(snapshot, theme)),
                );
            }

            Message::DismissNotice => {
                self.notice = None;
            }
        }

        CosmicTask::none()
    }

    fn view(&self) -> Element<'_, Message> {
        pages::todos::todos_view(
            &self.snapshot,
            &self.input,
            &self.search_input,
            self.notice.as_deref(),
        )
    }
}

impl Tasklight {
    fn current_theme(&self) -> Theme {
        self.snapshot.theme.effective(self.device_theme)
    }

    /// Show `snapshot` unless a newer one is already on screen. Returns false
    /// for a stale snapshot.
    fn apply(&mut self, snapshot: Snapshot) -> bool {
        if !snapshot.supersedes(&self.snapshot) {
            log::debug!(
                "Ignoring stale snapshot r{} (showing r{})",
                snapshot.revision,
                self.snapshot.revision
            );
            return false;
        }
        self.snapshot = snapshot;
        true
    }
}

fn device_theme() -> Theme {
    if cosmic::theme::system_preference().cosmic().is_dark {
        Theme::Dark
    } else {
        Theme::Light
    }
}

fn set_theme(theme: Theme) -> CosmicTask<Message> {
    let cosmic_theme = match theme {
        Theme::Light => cosmic::Theme::light(),
        Theme::Dark => cosmic::Theme::dark(),
    };
    cosmic::command::set_theme(cosmic_theme)
}
