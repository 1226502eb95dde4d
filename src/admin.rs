use super::*;

pub(super) struct AdminView {
    storage: Arc<Storage>,
}

impl AdminView {
    pub(super) fn new(storage: Arc<Storage>) -> Self {
        AdminView { storage }
    }

    pub(super) async fn panel(&self) -> View {
        let user_ids = self.storage.all_users_with_data().await;
        if user_ids.is_empty() {
            return View::new("Admin panel\n\nNo users yet.").row(back_to_main());
        }

        let mut view = View::new(format!("Admin panel\n\nUsers ({}):", user_ids.len()));
        for user_id in user_ids {
            let name = self.user_label(user_id).await;
            let total = self.storage.total_entries(user_id).await;
            view = view.row(vec![choice(
                format!("{} ({})", name, total),
                Action::AdminOpenUser(user_id),
            )]);
        }
        view.row(back_to_main())
    }

    pub(super) async fn user(&self, user_id: u64) -> View {
        let mut text = format!("User {}\nID: {}", self.user_label(user_id).await, user_id);
        if let Some(profile) = self.storage.profile(user_id).await {
            text.push_str(&format!(
                "\nLast seen: {}",
                profile.last_seen.format("%Y-%m-%d %H:%M UTC")
            ));
        }

        let counts = self.storage.category_counts(user_id).await;
        if counts.is_empty() {
            text.push_str("\n\nNo data stored.");
        } else {
            text.push_str("\n\nCategories:");
        }

        let mut view = View::new(text);
        for (category, count) in counts {
            view = view.row(vec![choice(
                format!("{} ({})", category, count),
                Action::AdminOpenUserCategory { user_id, category },
            )]);
        }
        let custom = self.storage.custom_categories(user_id).await;
        view.row(vec![choice(
            format!("Custom categories ({})", custom.len()),
            Action::AdminOpenCustomCategories(user_id),
        )])
        .row(vec![choice("« Back", Action::AdminOpenPanel)])
    }

    pub(super) async fn user_category(&self, user_id: u64, category: &str) -> View {
        let entries = self.storage.list_entries(user_id, category).await;
        entries_view(category, &entries, Action::AdminOpenUser(user_id))
    }

    pub(super) async fn custom_categories(&self, user_id: u64) -> View {
        let custom = self.storage.custom_categories(user_id).await;
        let mut text = format!("Custom categories of {}\n\n", self.user_label(user_id).await);
        if custom.is_empty() {
            text.push_str("None.");
        } else {
            for (idx, name) in custom.iter().enumerate() {
                text.push_str(&format!("{}. {}\n", idx + 1, name));
            }
        }
        View::new(text.trim_end()).row(vec![choice("« Back", Action::AdminOpenUser(user_id))])
    }

    async fn user_label(&self, user_id: u64) -> String {
        match self.storage.profile(user_id).await {
            Some(profile) => profile.display_name(),
            None => user_id.to_string(),
        }
    }
}

fn back_to_main() -> Vec<Choice> {
    vec![choice("« Main menu", Action::NavigateBack)]
}
