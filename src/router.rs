use super::*;

const HELP_TEXT: &str = "Use the buttons to add, view or delete notes in each category. \
Commands: /start shows the menu, /cancel stops a pending add, /help shows this text.";

#[derive(Clone, Debug)]
pub(super) struct Sender {
    pub(super) user_id: u64,
    pub(super) chat_id: i64,
    pub(super) first_name: String,
    pub(super) username: Option<String>,
}

impl Sender {
    fn session_key(&self) -> SessionKey {
        SessionKey {
            user_id: self.user_id,
            chat_id: self.chat_id,
        }
    }

    fn profile(&self) -> Profile {
        Profile {
            first_name: self.first_name.clone(),
            username: self.username.clone(),
            last_seen: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) enum Reply {
    Show(View),
    Notice(String),
}

pub(super) struct Router {
    storage: Arc<Storage>,
    sessions: SessionStore,
    admin: AdminView,
    admin_id: u64,
}

impl Router {
    pub(super) fn new(storage: Arc<Storage>, admin_id: u64) -> Self {
        Router {
            admin: AdminView::new(storage.clone()),
            storage,
            sessions: SessionStore::new(),
            admin_id,
        }
    }

    fn is_admin(&self, from: &Sender) -> bool {
        from.user_id == self.admin_id
    }

    #[cfg(test)]
    pub(super) async fn session(&self, from: &Sender) -> Session {
        self.sessions.current(from.session_key()).await
    }

    pub(super) async fn handle_action(&self, from: &Sender, data: &str) -> Reply {
        let Some(action) = Action::parse(data) else {
            warn!("malformed action from {}: {:?}", from.user_id, data);
            return Reply::Notice("Invalid action.".to_string());
        };

        // Rejected requests must not touch storage, the profile cache included.
        if action.is_admin_only() && !self.is_admin(from) {
            warn!("denied admin action from {}: {:?}", from.user_id, action);
            return Reply::Notice("Access denied.".to_string());
        }

        self.storage.record_profile(from.user_id, from.profile()).await;

        Reply::Show(self.dispatch(from, action).await)
    }

    async fn dispatch(&self, from: &Sender, action: Action) -> View {
        let user_id = from.user_id;
        match action {
            Action::NavigateBack => main_menu_view("Choose an option:", self.is_admin(from)),
            Action::OpenAddMenu => self.category_menu(from, MenuKind::Add).await,
            Action::OpenViewMenu => self.category_menu(from, MenuKind::View).await,
            Action::OpenDeleteMenu => self.category_menu(from, MenuKind::Delete).await,
            Action::OpenAddCategoryFlow => {
                self.start_flow(from, SessionEvent::StartAddCategory).await;
                add_category_prompt_view()
            }
            Action::CancelPending => self.cancel(from).await,
            Action::SelectCategoryForAdd(category) => {
                if !self.storage.is_known_category(user_id, &category).await {
                    return self.category_not_found(from);
                }
                let prompt = add_item_prompt_view(&category);
                self.start_flow(from, SessionEvent::StartAddItem { category })
                    .await;
                prompt
            }
            Action::SelectCategoryForView(category) => {
                if !self.storage.is_known_category(user_id, &category).await {
                    return self.category_not_found(from);
                }
                let entries = self.storage.list_entries(user_id, &category).await;
                entries_view(&category, &entries, Action::OpenViewMenu)
            }
            Action::SelectCategoryForDelete(category) => {
                if !self.storage.is_known_category(user_id, &category).await {
                    return self.category_not_found(from);
                }
                let entries = self.storage.list_entries(user_id, &category).await;
                delete_menu_view(&category, &entries)
            }
            Action::DeleteItem { category, index } => {
                // Delete and re-list under one lock so the refreshed indices
                // are exactly what the next press will act on.
                let (outcome, remaining) = self
                    .storage
                    .with_user(user_id, |user, _| {
                        let outcome = user.delete_entry(&category, index);
                        (outcome, user.entries(&category).to_vec())
                    })
                    .await;
                match outcome {
                    DeleteOutcome::Deleted(entry) => {
                        info!("user {} deleted item {} from {}", user_id, index, category);
                        deleted_view(&category, &entry, &remaining)
                    }
                    DeleteOutcome::NotFound => {
                        not_found_view("Item not found.", self.is_admin(from))
                    }
                }
            }
            Action::DeleteAllInCategory(category) => {
                let count = self.storage.delete_all(user_id, &category).await;
                if count > 0 {
                    info!("user {} deleted {} item(s) from {}", user_id, count, category);
                }
                deleted_all_view(&category, count)
            }
            Action::AdminOpenPanel => self.admin.panel().await,
            Action::AdminOpenUser(target) => self.admin.user(target).await,
            Action::AdminOpenUserCategory {
                user_id: target,
                category,
            } => self.admin.user_category(target, &category).await,
            Action::AdminOpenCustomCategories(target) => {
                self.admin.custom_categories(target).await
            }
        }
    }

    pub(super) async fn handle_text(&self, from: &Sender, text: &str) -> View {
        self.storage.record_profile(from.user_id, from.profile()).await;

        let effect = self
            .sessions
            .apply(from.session_key(), SessionEvent::Text(text.to_string()))
            .await;

        match effect {
            SessionEffect::SaveEntry { category, text } => {
                self.storage.add_entry(from.user_id, &category, &text).await;
                info!("user {} saved an item in {}", from.user_id, category);
                saved_view(&category, self.is_admin(from))
            }
            SessionEffect::CreateCategory { name } => {
                match self.storage.add_custom_category(from.user_id, &name).await {
                    CategoryOutcome::Added => {
                        info!("user {} created category {}", from.user_id, name);
                        category_created_view(&name)
                    }
                    CategoryOutcome::AlreadyExists => {
                        category_rejected_view(&format!("Category {} already exists.", name))
                    }
                    CategoryOutcome::Invalid(reason) => category_rejected_view(reason),
                }
            }
            SessionEffect::Unexpected { text } => {
                debug!(
                    "user {} sent {} char(s) with nothing pending",
                    from.user_id,
                    text.chars().count()
                );
                main_menu_view(
                    "Nothing is waiting for text. Choose an option:",
                    self.is_admin(from),
                )
            }
            SessionEffect::Prompted { .. } | SessionEffect::Cancelled { .. } => {
                main_menu_view("Choose an option:", self.is_admin(from))
            }
        }
    }

    pub(super) async fn handle_command(&self, from: &Sender, command: &str) -> View {
        if command == "admin" && !self.is_admin(from) {
            warn!("denied /admin from {}", from.user_id);
            return main_menu_view("Access denied.", false);
        }

        self.storage.record_profile(from.user_id, from.profile()).await;

        match command {
            "start" => main_menu_view(
                format!(
                    "Hello {}!\n\nWelcome to the Category Manager Bot.\nChoose an option:",
                    from.first_name
                ),
                self.is_admin(from),
            ),
            "cancel" => self.cancel(from).await,
            "admin" => self.admin.panel().await,
            _ => main_menu_view(HELP_TEXT, self.is_admin(from)),
        }
    }

    async fn category_menu(&self, from: &Sender, kind: MenuKind) -> View {
        let categories = self.storage.list_categories(from.user_id).await;
        category_menu_view(kind, &categories)
    }

    async fn start_flow(&self, from: &Sender, event: SessionEvent) {
        let effect = self.sessions.apply(from.session_key(), event).await;
        if let SessionEffect::Prompted {
            replaced: Some(previous),
        } = effect
        {
            debug!("user {} replaced pending {:?}", from.user_id, previous);
        }
    }

    async fn cancel(&self, from: &Sender) -> View {
        let effect = self
            .sessions
            .apply(from.session_key(), SessionEvent::Cancel)
            .await;
        let text = match effect {
            SessionEffect::Cancelled { had_pending: true } => "Cancelled.",
            _ => "Nothing to cancel.",
        };
        main_menu_view(text, self.is_admin(from))
    }

    fn category_not_found(&self, from: &Sender) -> View {
        not_found_view("Category not found.", self.is_admin(from))
    }
}
