use super::*;

pub(super) const TOKEN_SEPARATOR: char = ':';

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) enum Action {
    NavigateBack,
    OpenAddMenu,
    OpenViewMenu,
    OpenDeleteMenu,
    OpenAddCategoryFlow,
    CancelPending,
    SelectCategoryForAdd(String),
    SelectCategoryForView(String),
    SelectCategoryForDelete(String),
    DeleteItem { category: String, index: usize },
    DeleteAllInCategory(String),
    AdminOpenPanel,
    AdminOpenUser(u64),
    AdminOpenUserCategory { user_id: u64, category: String },
    AdminOpenCustomCategories(u64),
}

impl Action {
    pub(super) fn token(&self) -> String {
        match self {
            Action::NavigateBack => "main".to_string(),
            Action::OpenAddMenu => "m:add".to_string(),
            Action::OpenViewMenu => "m:view".to_string(),
            Action::OpenDeleteMenu => "m:del".to_string(),
            Action::OpenAddCategoryFlow => "m:newcat".to_string(),
            Action::CancelPending => "cancel".to_string(),
            Action::SelectCategoryForAdd(category) => format!("add:{}", category),
            Action::SelectCategoryForView(category) => format!("view:{}", category),
            Action::SelectCategoryForDelete(category) => format!("del:{}", category),
            Action::DeleteItem { category, index } => format!("delitem:{}:{}", index, category),
            Action::DeleteAllInCategory(category) => format!("delall:{}", category),
            Action::AdminOpenPanel => "adm".to_string(),
            Action::AdminOpenUser(user_id) => format!("adm:u:{}", user_id),
            Action::AdminOpenUserCategory { user_id, category } => {
                format!("adm:c:{}:{}", user_id, category)
            }
            Action::AdminOpenCustomCategories(user_id) => format!("adm:x:{}", user_id),
        }
    }

    pub(super) fn parse(data: &str) -> Option<Action> {
        let (head, rest) = match data.split_once(TOKEN_SEPARATOR) {
            Some((head, rest)) => (head, Some(rest)),
            None => (data, None),
        };

        match (head, rest) {
            ("main", None) => Some(Action::NavigateBack),
            ("cancel", None) => Some(Action::CancelPending),
            ("m", Some(menu)) => match menu {
                "add" => Some(Action::OpenAddMenu),
                "view" => Some(Action::OpenViewMenu),
                "del" => Some(Action::OpenDeleteMenu),
                "newcat" => Some(Action::OpenAddCategoryFlow),
                _ => None,
            },
            ("add", Some(category)) => category_segment(category).map(Action::SelectCategoryForAdd),
            ("view", Some(category)) => {
                category_segment(category).map(Action::SelectCategoryForView)
            }
            ("del", Some(category)) => {
                category_segment(category).map(Action::SelectCategoryForDelete)
            }
            ("delall", Some(category)) => {
                category_segment(category).map(Action::DeleteAllInCategory)
            }
            ("delitem", Some(payload)) => {
                let (index, category) = payload.split_once(TOKEN_SEPARATOR)?;
                Some(Action::DeleteItem {
                    index: number_segment(index)?,
                    category: category_segment(category)?,
                })
            }
            ("adm", None) => Some(Action::AdminOpenPanel),
            ("adm", Some(payload)) => parse_admin(payload),
            _ => None,
        }
    }

    pub(super) fn is_admin_only(&self) -> bool {
        matches!(
            self,
            Action::AdminOpenPanel
                | Action::AdminOpenUser(_)
                | Action::AdminOpenUserCategory { .. }
                | Action::AdminOpenCustomCategories(_)
        )
    }
}

fn parse_admin(payload: &str) -> Option<Action> {
    let mut parts = payload.splitn(3, TOKEN_SEPARATOR);
    let kind = parts.next()?;
    let user_id = number_segment(parts.next()?)?;
    match (kind, parts.next()) {
        ("u", None) => Some(Action::AdminOpenUser(user_id)),
        ("x", None) => Some(Action::AdminOpenCustomCategories(user_id)),
        ("c", Some(category)) => Some(Action::AdminOpenUserCategory {
            user_id,
            category: category_segment(category)?,
        }),
        _ => None,
    }
}

fn category_segment(segment: &str) -> Option<String> {
    if category_name_problem(segment).is_some() {
        return None;
    }
    Some(segment.to_string())
}

fn number_segment<T: std::str::FromStr>(segment: &str) -> Option<T> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}
