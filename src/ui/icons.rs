pub struct Icons;

impl Icons {
    pub const TEA: &str = "🍵";
    pub const CHECK: &str = "✅";
    pub const CROSS: &str = "❌";
    pub const WARN: &str = "⚠️";
    pub const STATS: &str = "📊";
    pub const LINK: &str = "🔗";
    pub const NEW: &str = "✨";
    pub const MOD: &str = "📝";
    pub const DEL: &str = "🗑️";
    pub const PACKAGE: &str = "📦";
    pub const DATABASE: &str = "🗄️";
    pub const UP: &str = "⬆️";
    pub const DOWN: &str = "⬇️";
    pub const MAG: &str = "🔎";
    pub const MAIL: &str = "✉️";
    pub const EMPTY: &str = "∅";
}
