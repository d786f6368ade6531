//! Routes, categories, and the route table.
//!
//! A [`Route`] is one command: a primary pattern, optional aliases, a
//! description, its [`Category`], and the handler. Routes are registered once
//! during startup and never change afterwards; the [`RouteTable`] owns them in
//! registration order, which is also the order the matcher scans them in.
//!
//! Categories exist for listing and help output. Each route belongs to exactly
//! one, and the category keeps the indices of its routes in registration
//! order.

use std::fmt;
use std::sync::Arc;

use crate::error::RegistrationError;
use crate::handler::{BoxedCommandHandler, CommandHandler};

/// Identifies a category within one route table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CategoryId(usize);

impl CategoryId {
    pub const fn index(self) -> usize {
        self.0
    }
}

/// The categories every route table starts with.
pub mod categories {
    use super::CategoryId;

    pub const AUDIO: CategoryId = CategoryId(0);
    pub const EXPERIENCE: CategoryId = CategoryId(1);
    pub const MANUALS: CategoryId = CategoryId(2);
    pub const MEDIA: CategoryId = CategoryId(3);
    pub const MODERATION: CategoryId = CategoryId(4);
    pub const SYSTEM: CategoryId = CategoryId(5);

    pub(crate) const PREDEFINED: [(&str, &str); 6] = [
        ("Audio", "Audio related utilities."),
        ("Experience", "Chat experience and ranking system."),
        ("Manuals", "The operation manual pager utility."),
        ("Media", "Media related utilities."),
        ("Moderation", "Chat moderation utilities."),
        ("System", "System-related utilities."),
    ];
}

/// A named group of routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    title: String,
    description: String,
    routes: Vec<usize>,
}

impl Category {
    fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            routes: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// A registered command.
#[derive(Clone)]
pub struct Route {
    pattern: String,
    aliases: Vec<String>,
    description: String,
    category: CategoryId,
    handler: BoxedCommandHandler,
}

impl Route {
    /// Creates a route with no aliases and an empty description.
    pub fn new<H>(pattern: impl Into<String>, category: CategoryId, handler: H) -> Self
    where
        H: CommandHandler,
    {
        Self {
            pattern: pattern.into(),
            aliases: Vec::new(),
            description: String::new(),
            category,
            handler: Arc::new(handler),
        }
    }

    /// Adds an alias pattern.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Sets the human-readable description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn get_description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> CategoryId {
        self.category
    }

    pub(crate) fn handler(&self) -> &BoxedCommandHandler {
        &self.handler
    }

    /// Whether `token` equals the pattern or one of the aliases.
    pub fn matches_exactly(&self, token: &str) -> bool {
        self.pattern == token || self.aliases.iter().any(|alias| alias == token)
    }

    fn tokens(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.pattern.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("pattern", &self.pattern)
            .field("aliases", &self.aliases)
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}

/// All registered routes and categories.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
    categories: Vec<Category>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteTable {
    /// Creates a table holding only the predefined categories.
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            categories: categories::PREDEFINED
                .iter()
                .map(|(title, description)| Category::new(*title, *description))
                .collect(),
        }
    }

    /// Adds a category and returns its id.
    pub fn add_category(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> CategoryId {
        self.categories.push(Category::new(title, description));
        CategoryId(self.categories.len() - 1)
    }

    /// Registers a route, rejecting malformed or already-claimed patterns.
    pub fn register(&mut self, route: Route) -> Result<&Route, RegistrationError> {
        let category = route.category.index();
        if category >= self.categories.len() {
            return Err(RegistrationError::UnknownCategory(category));
        }

        let mut seen: Vec<&str> = Vec::new();
        for token in route.tokens() {
            if token.is_empty() || token.chars().any(char::is_whitespace) {
                return Err(RegistrationError::InvalidPattern(token.to_owned()));
            }
            if seen.contains(&token) {
                return Err(RegistrationError::Conflict {
                    token: token.to_owned(),
                    owner: route.pattern.clone(),
                });
            }
            if let Some(owner) = self.routes.iter().find(|r| r.matches_exactly(token)) {
                return Err(RegistrationError::Conflict {
                    token: token.to_owned(),
                    owner: owner.pattern.clone(),
                });
            }
            seen.push(token);
        }

        let index = self.routes.len();
        self.categories[category].routes.push(index);
        self.routes.push(route);
        Ok(&self.routes[index])
    }

    /// Routes in registration order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Categories in creation order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Categories paired with their identifiers, in creation order.
    pub fn iter_categories(&self) -> impl Iterator<Item = (CategoryId, &Category)> {
        self.categories
            .iter()
            .enumerate()
            .map(|(index, category)| (CategoryId(index), category))
    }

    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.get(id.index())
    }

    /// The routes of a category, in registration order.
    pub fn routes_in(&self, id: CategoryId) -> impl Iterator<Item = &Route> {
        self.categories
            .get(id.index())
            .into_iter()
            .flat_map(|c| c.routes.iter().map(|&i| &self.routes[i]))
    }

    /// Looks up a route by exact pattern or alias.
    pub fn get(&self, token: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.matches_exactly(token))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
