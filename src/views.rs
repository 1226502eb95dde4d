use super::*;

const BUTTON_PREVIEW_CHARS: usize = 40;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct Choice {
    pub(super) label: String,
    pub(super) action: Action,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct View {
    pub(super) text: String,
    pub(super) rows: Vec<Vec<Choice>>,
}

impl View {
    pub(super) fn new(text: impl Into<String>) -> Self {
        View {
            text: text.into(),
            rows: Vec::new(),
        }
    }

    pub(super) fn row(mut self, row: Vec<Choice>) -> Self {
        if !row.is_empty() {
            self.rows.push(row);
        }
        self
    }

    #[cfg(test)]
    pub(super) fn choices(&self) -> impl Iterator<Item = &Choice> {
        self.rows.iter().flatten()
    }

    #[cfg(test)]
    pub(super) fn has_action(&self, action: &Action) -> bool {
        self.choices().any(|choice| &choice.action == action)
    }
}

pub(super) fn choice(label: impl Into<String>, action: Action) -> Choice {
    Choice {
        label: label.into(),
        action,
    }
}

fn back(action: Action) -> Vec<Choice> {
    vec![choice("« Back", action)]
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum MenuKind {
    Add,
    View,
    Delete,
}

pub(super) fn main_menu_view(text: impl Into<String>, is_admin: bool) -> View {
    let mut view = View::new(text)
        .row(vec![
            choice("Add", Action::OpenAddMenu),
            choice("View", Action::OpenViewMenu),
        ])
        .row(vec![
            choice("Delete", Action::OpenDeleteMenu),
            choice("New category", Action::OpenAddCategoryFlow),
        ]);
    if is_admin {
        view = view.row(vec![choice("Admin panel", Action::AdminOpenPanel)]);
    }
    view
}

pub(super) fn category_menu_view(kind: MenuKind, categories: &[CategoryInfo]) -> View {
    let text = match kind {
        MenuKind::Add => "Select a category to add data:",
        MenuKind::View => "Select a category to view data:",
        MenuKind::Delete => "Select a category to delete data from:",
    };
    let mut view = View::new(text);
    for info in categories {
        let action = match kind {
            MenuKind::Add => Action::SelectCategoryForAdd(info.name.clone()),
            MenuKind::View => Action::SelectCategoryForView(info.name.clone()),
            MenuKind::Delete => Action::SelectCategoryForDelete(info.name.clone()),
        };
        let label = if info.is_custom {
            format!("{} *", info.name)
        } else {
            info.name.clone()
        };
        view = view.row(vec![choice(label, action)]);
    }
    if kind == MenuKind::Add {
        view = view.row(vec![choice("+ New category", Action::OpenAddCategoryFlow)]);
    }
    view.row(back(Action::NavigateBack))
}

pub(super) fn format_entries(category: &str, entries: &[String]) -> String {
    if entries.is_empty() {
        return "No data found.".to_string();
    }
    let mut text = format!("{}\n\n", category);
    for (idx, entry) in entries.iter().enumerate() {
        text.push_str(&format!("{}. {}\n", idx + 1, entry));
    }
    text.trim_end().to_string()
}

pub(super) fn entries_view(category: &str, entries: &[String], back_to: Action) -> View {
    View::new(format_entries(category, entries)).row(back(back_to))
}

pub(super) fn add_item_prompt_view(category: &str) -> View {
    View::new(format!(
        "Send me the text you want to save in:\n{}\n\nType /cancel to cancel.",
        category
    ))
    .row(vec![choice("Cancel", Action::CancelPending)])
}

pub(super) fn add_category_prompt_view() -> View {
    View::new("Send me the name of the new category.\n\nType /cancel to cancel.")
        .row(vec![choice("Cancel", Action::CancelPending)])
}

pub(super) fn saved_view(category: &str, is_admin: bool) -> View {
    main_menu_view(format!("Saved in {}.", category), is_admin).row(vec![choice(
        format!("Add another to {}", category),
        Action::SelectCategoryForAdd(category.to_string()),
    )])
}

pub(super) fn category_created_view(name: &str) -> View {
    View::new(format!("Category {} created.", name))
        .row(vec![choice(
            format!("Add to {}", name),
            Action::SelectCategoryForAdd(name.to_string()),
        )])
        .row(back(Action::NavigateBack))
}

pub(super) fn category_rejected_view(reason: &str) -> View {
    View::new(reason)
        .row(vec![choice("Try another name", Action::OpenAddCategoryFlow)])
        .row(back(Action::NavigateBack))
}

pub(super) fn delete_menu_view(category: &str, entries: &[String]) -> View {
    if entries.is_empty() {
        return View::new("No data found to delete.").row(back(Action::OpenDeleteMenu));
    }
    let mut view = View::new(format!(
        "Delete from {}\n\nSelect an item to delete:",
        category
    ));
    for (idx, entry) in entries.iter().enumerate() {
        view = view.row(vec![choice(
            format!("{}. {}", idx + 1, truncate_label(entry)),
            Action::DeleteItem {
                category: category.to_string(),
                index: idx,
            },
        )]);
    }
    view.row(vec![choice(
        "Delete all",
        Action::DeleteAllInCategory(category.to_string()),
    )])
    .row(back(Action::OpenDeleteMenu))
}

pub(super) fn deleted_view(category: &str, deleted: &str, remaining: &[String]) -> View {
    let mut view = delete_menu_view(category, remaining);
    view.text = format!(
        "Deleted from {}:\n\n{}\n\n{}",
        category, deleted, view.text
    );
    view.row(vec![choice("« Main menu", Action::NavigateBack)])
}

pub(super) fn deleted_all_view(category: &str, count: usize) -> View {
    let text = if count == 0 {
        "No data found.".to_string()
    } else {
        format!("Deleted all {} item(s) from {}.", count, category)
    };
    View::new(text).row(vec![
        choice("« Back to delete", Action::OpenDeleteMenu),
        choice("« Main menu", Action::NavigateBack),
    ])
}

pub(super) fn not_found_view(text: &str, is_admin: bool) -> View {
    main_menu_view(text, is_admin)
}

fn truncate_label(text: &str) -> String {
    let first_line = text.lines().next().unwrap_or("");
    let mut label: String = first_line.chars().take(BUTTON_PREVIEW_CHARS).collect();
    if first_line.chars().count() > BUTTON_PREVIEW_CHARS || text.lines().nth(1).is_some() {
        label.push_str("...");
    }
    label
}
