/// (name, color, icon) for the expense categories every new user starts with.
pub const DEFAULT_EXPENSE_CATEGORIES: &[(&str, &str, &str)] = &[
    ("Housing", "#6366f1", "home"),
    ("Utilities", "#0ea5e9", "zap"),
    ("Groceries", "#22c55e", "shopping-cart"),
    ("Dining Out", "#f97316", "utensils"),
    ("Transportation", "#eab308", "car"),
    ("Healthcare", "#ef4444", "heart-pulse"),
    ("Insurance", "#8b5cf6", "shield"),
    ("Entertainment", "#ec4899", "film"),
    ("Shopping", "#14b8a6", "shopping-bag"),
    ("Personal Care", "#f43f5e", "sparkles"),
    ("Education", "#3b82f6", "graduation-cap"),
    ("Subscriptions", "#a855f7", "repeat"),
    ("Travel", "#06b6d4", "plane"),
    ("Gifts & Donations", "#d946ef", "gift"),
    ("Other", "#64748b", "circle"),
];

pub const DEFAULT_INCOME_CATEGORIES: &[(&str, &str, &str)] = &[
    ("Salary", "#16a34a", "briefcase"),
    ("Freelance", "#0891b2", "laptop"),
    ("Investments", "#7c3aed", "trending-up"),
    ("Other Income", "#65a30d", "plus-circle"),
];

/// Color used when a category is created implicitly (e.g. from a budget template).
pub const FALLBACK_CATEGORY_COLOR: &str = "#64748b";
