//! User-facing error messages

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Language of the messages attached to normalized errors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Es,
}

impl Locale {
    /// Fallback for a 400 response whose body has no field messages
    pub fn invalid_request(self) -> &'static str {
        match self {
            Self::En => "Invalid request. Please check the data.",
            Self::Es => "Solicitud inválida. Por favor verifica los datos.",
        }
    }

    pub fn unauthorized(self) -> &'static str {
        match self {
            Self::En => "Unauthorized. Please sign in.",
            Self::Es => "No autorizado. Por favor inicia sesión.",
        }
    }

    pub fn forbidden(self) -> &'static str {
        match self {
            Self::En => "You do not have permission to perform this action.",
            Self::Es => "No tienes permisos para realizar esta acción.",
        }
    }

    pub fn not_found(self) -> &'static str {
        match self {
            Self::En => "Resource not found.",
            Self::Es => "Recurso no encontrado.",
        }
    }

    pub fn server_error(self) -> &'static str {
        match self {
            Self::En => "Internal server error. Please try again later.",
            Self::Es => "Error interno del servidor. Por favor intenta más tarde.",
        }
    }

    pub fn required(self) -> &'static str {
        match self {
            Self::En => "This field is required.",
            Self::Es => "Este campo es obligatorio.",
        }
    }

    pub fn too_long(self, max: usize) -> String {
        match self {
            Self::En => format!("Ensure this field has no more than {max} characters."),
            Self::Es => format!("Este campo no puede tener más de {max} caracteres."),
        }
    }

    pub fn too_short(self, min: usize) -> String {
        match self {
            Self::En => format!("Ensure this field has at least {min} characters."),
            Self::Es => format!("Este campo debe tener al menos {min} caracteres."),
        }
    }

    pub fn invalid_email(self) -> &'static str {
        match self {
            Self::En => "Enter a valid email address.",
            Self::Es => "Introduce un correo electrónico válido.",
        }
    }

    pub fn negative(self) -> &'static str {
        match self {
            Self::En => "Ensure this value is greater than or equal to 0.",
            Self::Es => "El valor debe ser mayor o igual a 0.",
        }
    }

    pub fn confirm_delete_person(self, full_name: &str) -> String {
        match self {
            Self::En => format!("Are you sure you want to delete {full_name}?"),
            Self::Es => format!("¿Está seguro que desea eliminar a {full_name}?"),
        }
    }

    pub fn confirm_delete_product(self, name: &str) -> String {
        match self {
            Self::En => format!("Are you sure you want to delete {name}?"),
            Self::Es => format!("¿Está seguro que desea eliminar el producto {name}?"),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::En => f.write_str("en"),
            Self::Es => f.write_str("es"),
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "es" => Ok(Self::Es),
            other => Err(format!("unsupported locale '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_locale_names() {
        assert_eq!("ES".parse::<Locale>().unwrap(), Locale::Es);
        assert_eq!(" en ".parse::<Locale>().unwrap(), Locale::En);
        assert!("fr".parse::<Locale>().is_err());
    }

    #[test]
    fn english_is_the_default() {
        assert_eq!(Locale::default().unauthorized(), "Unauthorized. Please sign in.");
    }

    #[test]
    fn delete_confirmation_names_the_record() {
        assert_eq!(
            Locale::En.confirm_delete_person("Juan Pérez"),
            "Are you sure you want to delete Juan Pérez?"
        );
        assert_eq!(
            Locale::Es.confirm_delete_person("Juan Pérez"),
            "¿Está seguro que desea eliminar a Juan Pérez?"
        );
    }
}
