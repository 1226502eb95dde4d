use super::*;

pub(super) const DEFAULT_CATEGORIES: [&str; 5] = [
    "Punching Bins",
    "Punching Methods",
    "Enroll Bins",
    "Enroll Methods",
    "Logs",
];

// Keeps `adm:c:<u64>:<name>` under Telegram's 64-byte callback data limit.
pub(super) const MAX_CATEGORY_NAME_BYTES: usize = 32;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct CategoryInfo {
    pub(super) name: String,
    pub(super) is_custom: bool,
}

#[derive(Clone, Debug)]
pub(super) struct Profile {
    pub(super) first_name: String,
    pub(super) username: Option<String>,
    pub(super) last_seen: DateTime<Utc>,
}

impl Profile {
    pub(super) fn display_name(&self) -> String {
        match &self.username {
            Some(handle) => format!("{} (@{})", self.first_name, handle),
            None => self.first_name.clone(),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub(super) enum DeleteOutcome {
    Deleted(String),
    NotFound,
}

#[derive(Debug, PartialEq, Eq)]
pub(super) enum CategoryOutcome {
    Added,
    AlreadyExists,
    Invalid(&'static str),
}

pub(super) fn category_name_problem(name: &str) -> Option<&'static str> {
    if name.trim().is_empty() {
        return Some("Category name cannot be empty.");
    }
    if name.contains(TOKEN_SEPARATOR) {
        return Some("Category name cannot contain ':'.");
    }
    if name.len() > MAX_CATEGORY_NAME_BYTES {
        return Some("Category name is too long (32 bytes max).");
    }
    None
}

#[derive(Debug, Default)]
pub(super) struct UserRecord {
    custom_categories: Vec<String>,
    entries: HashMap<String, Vec<String>>,
}

impl UserRecord {
    pub(super) fn add_entry(&mut self, category: &str, text: &str) {
        self.entries
            .entry(category.to_string())
            .or_default()
            .push(text.to_string());
    }

    pub(super) fn entries(&self, category: &str) -> &[String] {
        self.entries
            .get(category)
            .map(|list| list.as_slice())
            .unwrap_or(&[])
    }

    pub(super) fn delete_entry(&mut self, category: &str, index: usize) -> DeleteOutcome {
        match self.entries.get_mut(category) {
            Some(list) if index < list.len() => DeleteOutcome::Deleted(list.remove(index)),
            _ => DeleteOutcome::NotFound,
        }
    }

    pub(super) fn delete_all(&mut self, category: &str) -> usize {
        match self.entries.get_mut(category) {
            Some(list) => std::mem::take(list).len(),
            None => 0,
        }
    }

    pub(super) fn has_entries(&self) -> bool {
        self.entries.values().any(|list| !list.is_empty())
    }

    pub(super) fn total_entries(&self) -> usize {
        self.entries.values().map(|list| list.len()).sum()
    }

    pub(super) fn custom_categories(&self) -> &[String] {
        &self.custom_categories
    }

    pub(super) fn knows_category(&self, globals: &[String], name: &str) -> bool {
        globals.iter().any(|g| g == name) || self.custom_categories.iter().any(|c| c == name)
    }

    pub(super) fn add_custom_category(&mut self, globals: &[String], name: &str) -> CategoryOutcome {
        if let Some(problem) = category_name_problem(name) {
            return CategoryOutcome::Invalid(problem);
        }
        if self.knows_category(globals, name) {
            return CategoryOutcome::AlreadyExists;
        }
        self.custom_categories.push(name.to_string());
        CategoryOutcome::Added
    }

    pub(super) fn categories(&self, globals: &[String]) -> Vec<CategoryInfo> {
        let global = globals.iter().map(|name| CategoryInfo {
            name: name.clone(),
            is_custom: false,
        });
        let custom = self.custom_categories.iter().map(|name| CategoryInfo {
            name: name.clone(),
            is_custom: true,
        });
        global.chain(custom).collect()
    }

    pub(super) fn category_counts(&self, globals: &[String]) -> Vec<(String, usize)> {
        self.categories(globals)
            .into_iter()
            .map(|info| {
                let count = self.entries(&info.name).len();
                (info.name, count)
            })
            .filter(|(_, count)| *count > 0)
            .collect()
    }
}

pub(super) struct Storage {
    global_categories: Vec<String>,
    users: Mutex<HashMap<u64, Arc<Mutex<UserRecord>>>>,
    profiles: Mutex<HashMap<u64, Profile>>,
}

impl Storage {
    pub(super) fn new(global_categories: Vec<String>) -> Self {
        Storage {
            global_categories,
            users: Mutex::new(HashMap::new()),
            profiles: Mutex::new(HashMap::new()),
        }
    }

    async fn record(&self, user_id: u64) -> Arc<Mutex<UserRecord>> {
        let mut users = self.users.lock().await;
        users.entry(user_id).or_default().clone()
    }

    async fn existing_record(&self, user_id: u64) -> Option<Arc<Mutex<UserRecord>>> {
        self.users.lock().await.get(&user_id).cloned()
    }

    pub(super) async fn with_user<T>(
        &self,
        user_id: u64,
        f: impl FnOnce(&mut UserRecord, &[String]) -> T,
    ) -> T {
        let record = self.record(user_id).await;
        let mut guard = record.lock().await;
        f(&mut *guard, self.global_categories.as_slice())
    }

    pub(super) async fn with_existing_user<T>(
        &self,
        user_id: u64,
        f: impl FnOnce(&UserRecord, &[String]) -> T,
    ) -> Option<T> {
        let record = self.existing_record(user_id).await?;
        let guard = record.lock().await;
        Some(f(&*guard, self.global_categories.as_slice()))
    }

    pub(super) async fn add_entry(&self, user_id: u64, category: &str, text: &str) {
        self.with_user(user_id, |user, _| user.add_entry(category, text))
            .await;
    }

    pub(super) async fn list_entries(&self, user_id: u64, category: &str) -> Vec<String> {
        self.with_existing_user(user_id, |user, _| user.entries(category).to_vec())
            .await
            .unwrap_or_default()
    }

    pub(super) async fn delete_all(&self, user_id: u64, category: &str) -> usize {
        let Some(record) = self.existing_record(user_id).await else {
            return 0;
        };
        let mut user = record.lock().await;
        user.delete_all(category)
    }

    pub(super) async fn add_custom_category(&self, user_id: u64, name: &str) -> CategoryOutcome {
        self.with_user(user_id, |user, globals| user.add_custom_category(globals, name))
            .await
    }

    pub(super) async fn list_categories(&self, user_id: u64) -> Vec<CategoryInfo> {
        match self
            .with_existing_user(user_id, |user, globals| user.categories(globals))
            .await
        {
            Some(categories) => categories,
            None => UserRecord::default().categories(&self.global_categories),
        }
    }

    pub(super) async fn custom_categories(&self, user_id: u64) -> Vec<String> {
        self.with_existing_user(user_id, |user, _| user.custom_categories().to_vec())
            .await
            .unwrap_or_default()
    }

    pub(super) async fn category_counts(&self, user_id: u64) -> Vec<(String, usize)> {
        self.with_existing_user(user_id, |user, globals| user.category_counts(globals))
            .await
            .unwrap_or_default()
    }

    pub(super) async fn total_entries(&self, user_id: u64) -> usize {
        self.with_existing_user(user_id, |user, _| user.total_entries())
            .await
            .unwrap_or(0)
    }

    pub(super) async fn is_known_category(&self, user_id: u64, name: &str) -> bool {
        if self.global_categories.iter().any(|g| g == name) {
            return true;
        }
        self.with_existing_user(user_id, |user, globals| user.knows_category(globals, name))
            .await
            .unwrap_or(false)
    }

    pub(super) async fn record_profile(&self, user_id: u64, profile: Profile) {
        self.profiles.lock().await.insert(user_id, profile);
    }

    pub(super) async fn profile(&self, user_id: u64) -> Option<Profile> {
        self.profiles.lock().await.get(&user_id).cloned()
    }

    pub(super) async fn all_users_with_data(&self) -> BTreeSet<u64> {
        let mut ids: BTreeSet<u64> = self.profiles.lock().await.keys().copied().collect();
        let records: Vec<(u64, Arc<Mutex<UserRecord>>)> = self
            .users
            .lock()
            .await
            .iter()
            .map(|(id, record)| (*id, record.clone()))
            .collect();
        for (id, record) in records {
            if record.lock().await.has_entries() {
                ids.insert(id);
            }
        }
        ids
    }
}
