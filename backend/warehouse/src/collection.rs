use std::fmt;

use serde::Serialize;

/// Collections the dashboard reads. Names are the ones used in the source database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Reviews,
    Menus,
    Messages,
    Notifications,
    Orders,
    Dishes,
    Reports,
    Restaurants,
    Users,
}

impl Collection {
    pub const ALL: [Collection; 9] = [
        Collection::Reviews,
        Collection::Menus,
        Collection::Messages,
        Collection::Notifications,
        Collection::Orders,
        Collection::Dishes,
        Collection::Reports,
        Collection::Restaurants,
        Collection::Users,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Collection::Reviews => "avaliacoes",
            Collection::Menus => "cardapios",
            Collection::Messages => "mensagens",
            Collection::Notifications => "notificacoes",
            Collection::Orders => "pedidos",
            Collection::Dishes => "pratos",
            Collection::Reports => "relatorios",
            Collection::Restaurants => "restaurantes",
            Collection::Users => "usuarios",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
