use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// The four administrable collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Users,
    Orders,
    OrderLines,
    Brands,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Users,
        ResourceKind::Orders,
        ResourceKind::OrderLines,
        ResourceKind::Brands,
    ];

    /// Path segment used in in-app routes.
    pub fn slug(self) -> &'static str {
        match self {
            ResourceKind::Users => "usuario",
            ResourceKind::Orders => "pedido",
            ResourceKind::OrderLines => "detalle-pedido",
            ResourceKind::Brands => "marca",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.slug() == slug)
    }

    pub fn title(self) -> &'static str {
        match self {
            ResourceKind::Users => "Usuarios",
            ResourceKind::Orders => "Pedidos",
            ResourceKind::OrderLines => "Detalles del Pedido",
            ResourceKind::Brands => "Marcas",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    List(ResourceKind),
    Create(ResourceKind),
    Edit(ResourceKind, i64),
    Delete(ResourceKind, i64),
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Home => f.write_str("/"),
            Route::Login => f.write_str("/login"),
            Route::List(kind) => write!(f, "/{}", kind.slug()),
            Route::Create(kind) => write!(f, "/agregar-{}", kind.slug()),
            Route::Edit(kind, id) => write!(f, "/editar-{}/{}", kind.slug(), id),
            Route::Delete(kind, id) => write!(f, "/eliminar-{}/{}", kind.slug(), id),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
#[error("Unknown route: {0}")]
pub struct UnknownRoute(pub String);

impl FromStr for Route {
    type Err = UnknownRoute;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let unknown = || UnknownRoute(path.to_string());
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

        match segments.as_slice() {
            [""] => Ok(Route::Home),
            ["login"] => Ok(Route::Login),
            [page] => {
                if let Some(slug) = page.strip_prefix("agregar-") {
                    ResourceKind::from_slug(slug).map(Route::Create).ok_or_else(unknown)
                } else {
                    ResourceKind::from_slug(page).map(Route::List).ok_or_else(unknown)
                }
            }
            [page, id] => {
                let id: i64 = id.parse().map_err(|_| unknown())?;
                if let Some(kind) = page.strip_prefix("editar-").and_then(ResourceKind::from_slug) {
                    Ok(Route::Edit(kind, id))
                } else if let Some(kind) = page.strip_prefix("eliminar-").and_then(ResourceKind::from_slug) {
                    Ok(Route::Delete(kind, id))
                } else {
                    Err(unknown())
                }
            }
            _ => Err(unknown()),
        }
    }
}
