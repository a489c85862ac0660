//! Default food catalog and the rules for reconciling it with stored data.
//!
//! The default catalog is compiled in and may grow between releases. A stored
//! catalog is never thrown away: every load merges it with the current
//! defaults so new foods and updated recipes show up while the user's
//! active/inactive choices and custom foods survive.

use log::info;
use rand::seq::SliceRandom;
use rand::Rng;
use shared::{FoodItem, Recipe};
use std::collections::HashSet;

/// Palette for user-added foods, picked in rotation
pub const CUSTOM_FOOD_COLORS: [&str; 8] = [
    "#4D96FF", "#F9C74F", "#FF6B9D", "#9B59B6", "#2ECC71", "#E74C3C", "#3498DB", "#F39C12",
];

/// Color for the n-th user-added food
pub fn custom_food_color(custom_food_count: usize) -> &'static str {
    CUSTOM_FOOD_COLORS[custom_food_count % CUSTOM_FOOD_COLORS.len()]
}

fn default_food(id: &str, name: &str, color: &str, recipe: Recipe) -> FoodItem {
    FoodItem {
        id: id.to_string(),
        name: name.to_string(),
        color: color.to_string(),
        is_default: true,
        // Assigned on first load or by the merge
        is_active: false,
        recipe: Some(recipe),
    }
}

/// The system-provided foods, in catalog order
pub fn default_foods() -> Vec<FoodItem> {
    vec![
        default_food(
            "hamburguesas",
            "Hamburguesas",
            "#E74C3C",
            Recipe::new(
                &[
                    "500g carne picada",
                    "4 panes de hamburguesa",
                    "Lechuga",
                    "Tomate",
                    "Queso cheddar",
                    "Sal y pimienta",
                ],
                &[
                    "Formar las hamburguesas con la carne picada y sazonar",
                    "Cocinar en plancha a fuego medio-alto 4-5 minutos por lado",
                    "Agregar el queso 1 minuto antes de terminar",
                    "Tostar los panes ligeramente",
                    "Armar con lechuga, tomate y tu salsa favorita",
                ],
            ),
        ),
        default_food(
            "pizza",
            "Pizza",
            "#F39C12",
            Recipe::new(
                &["Masa de pizza", "Salsa de tomate", "Muzzarella", "Orégano", "Aceite de oliva"],
                &[
                    "Estirar la masa en una pizzera aceitada",
                    "Agregar salsa de tomate",
                    "Cubrir con muzzarella",
                    "Espolvorear orégano",
                    "Hornear a 220°C por 15-20 minutos",
                ],
            ),
        ),
        default_food(
            "empanadas",
            "Empanadas",
            "#C0392B",
            Recipe::new(
                &[
                    "12 tapas de empanadas",
                    "400g carne picada",
                    "2 cebollas",
                    "1 morrón rojo",
                    "Comino y pimentón",
                    "Aceitunas",
                ],
                &[
                    "Rehogar la cebolla y el morrón picados",
                    "Agregar la carne y cocinar con especias",
                    "Dejar enfriar el relleno",
                    "Rellenar las tapas y repulgar",
                    "Hornear a 200°C por 20-25 minutos",
                ],
            ),
        ),
        default_food(
            "pasta",
            "Pasta",
            "#27AE60",
            Recipe::new(
                &["500g pasta (fideos)", "Salsa a elección", "Queso rallado", "Sal"],
                &[
                    "Hervir abundante agua con sal",
                    "Cocinar la pasta según tiempo del paquete",
                    "Escurrir y mezclar con la salsa",
                    "Servir con queso rallado",
                ],
            ),
        ),
        default_food(
            "guiso",
            "Guiso",
            "#8E5A2A",
            Recipe::new(
                &[
                    "500g carne picada o trozada",
                    "2 papas",
                    "1 zanahoria",
                    "1 cebolla",
                    "1 morrón",
                    "Caldo",
                    "Arroz o fideos",
                ],
                &[
                    "Dorar la carne en aceite",
                    "Agregar cebolla y morrón picados",
                    "Incorporar papas y zanahoria en cubos",
                    "Cubrir con caldo y cocinar 30 minutos",
                    "Agregar arroz o fideos y cocinar hasta que estén tiernos",
                ],
            ),
        ),
        default_food(
            "tarta",
            "Tarta",
            "#16A085",
            Recipe::new(
                &[
                    "2 tapas de tarta",
                    "3 huevos",
                    "200ml crema de leche",
                    "Verduras o jamón y queso",
                    "Sal y pimienta",
                ],
                &[
                    "Colocar una tapa en molde aceitado",
                    "Preparar relleno con huevos batidos, crema y ingredientes",
                    "Verter sobre la tapa",
                    "Cubrir con la segunda tapa",
                    "Hornear a 180°C por 35-40 minutos",
                ],
            ),
        ),
        default_food(
            "polenta",
            "Polenta",
            "#F4D03F",
            Recipe::new(
                &["250g polenta", "1 litro agua o caldo", "Salsa a elección", "Queso rallado", "Sal"],
                &[
                    "Hervir agua con sal",
                    "Agregar polenta en lluvia, revolviendo constantemente",
                    "Cocinar 30-40 minutos hasta espesar",
                    "Servir con salsa y queso",
                ],
            ),
        ),
        default_food(
            "sushi",
            "Sushi",
            "#5DADE2",
            Recipe::new(
                &[
                    "Arroz para sushi",
                    "Alga nori",
                    "Pescado fresco o vegetales",
                    "Vinagre de arroz",
                    "Salsa de soja",
                ],
                &[
                    "Cocinar arroz y mezclarlo con vinagre",
                    "Colocar alga nori sobre esterilla",
                    "Distribuir arroz sobre el alga",
                    "Agregar relleno y enrollar firmemente",
                    "Cortar en porciones y servir con salsa",
                ],
            ),
        ),
        default_food(
            "tacos",
            "Tacos",
            "#9B59B6",
            Recipe::new(
                &[
                    "Tortillas de maíz",
                    "400g carne picada",
                    "Lechuga",
                    "Tomate",
                    "Queso",
                    "Especias mexicanas",
                ],
                &[
                    "Cocinar la carne con especias",
                    "Calentar las tortillas",
                    "Rellenar con carne",
                    "Agregar lechuga, tomate y queso",
                    "Servir con salsa picante",
                ],
            ),
        ),
        default_food(
            "milanesa",
            "Milanesa",
            "#EC7063",
            Recipe::new(
                &[
                    "4 milanesas de carne",
                    "2 huevos",
                    "Pan rallado",
                    "Perejil picado",
                    "Aceite para freír",
                    "Sal",
                ],
                &[
                    "Batir los huevos con sal",
                    "Mezclar pan rallado con perejil",
                    "Pasar milanesas por huevo y luego por pan rallado",
                    "Freír en aceite caliente hasta dorar",
                    "Servir con limón y tu guarnición favorita",
                ],
            ),
        ),
    ]
}

/// First-run catalog: the defaults shuffled (Fisher-Yates), with the first
/// `active_count` foods on the wheel and the rest off.
pub fn seed_catalog<R: Rng + ?Sized>(
    defaults: &[FoodItem],
    active_count: usize,
    rng: &mut R,
) -> Vec<FoodItem> {
    let mut shuffled = defaults.to_vec();
    shuffled.shuffle(rng);

    for (index, food) in shuffled.iter_mut().enumerate() {
        food.is_active = index < active_count;
    }

    shuffled
}

/// Reconcile a stored catalog with the current default catalog.
///
/// - stored foods whose id is a current default take the default's
///   definition but keep the stored `is_active`
/// - other stored foods (user-created) are kept as stored
/// - defaults missing from storage are appended, inactive
///
/// Merging an already merged list with the same defaults returns it unchanged.
pub fn merge_with_defaults(stored: Vec<FoodItem>, defaults: &[FoodItem]) -> Vec<FoodItem> {
    let mut merged: Vec<FoodItem> = stored
        .into_iter()
        .map(|saved| match defaults.iter().find(|d| d.id == saved.id) {
            Some(default) => FoodItem {
                is_active: saved.is_active,
                ..default.clone()
            },
            None => saved,
        })
        .collect();

    let existing_ids: HashSet<String> = merged.iter().map(|f| f.id.clone()).collect();
    let new_defaults: Vec<FoodItem> = defaults
        .iter()
        .filter(|d| !existing_ids.contains(&d.id))
        .map(|d| FoodItem {
            is_active: false,
            ..d.clone()
        })
        .collect();

    if !new_defaults.is_empty() {
        info!("Adding {} new default foods to the catalog", new_defaults.len());
    }

    merged.extend(new_defaults);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn custom(id: &str, name: &str, active: bool) -> FoodItem {
        FoodItem {
            id: id.to_string(),
            name: name.to_string(),
            color: "#4D96FF".to_string(),
            is_default: false,
            is_active: active,
            recipe: None,
        }
    }

    #[test]
    fn test_default_catalog_ids_are_unique() {
        let defaults = default_foods();
        let ids: HashSet<_> = defaults.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids.len(), defaults.len());
        assert!(defaults.iter().all(|f| f.is_default && f.recipe.is_some()));
    }

    #[test]
    fn test_custom_colors_rotate() {
        assert_eq!(custom_food_color(0), "#4D96FF");
        assert_eq!(custom_food_color(7), "#F39C12");
        assert_eq!(custom_food_color(8), "#4D96FF");
        assert_eq!(custom_food_color(9), "#F9C74F");
    }

    #[test]
    fn test_seed_activates_exactly_five() {
        let defaults = default_foods();
        let mut rng = StdRng::seed_from_u64(7);

        let seeded = seed_catalog(&defaults, 5, &mut rng);

        assert_eq!(seeded.len(), defaults.len());
        assert_eq!(seeded.iter().filter(|f| f.is_active).count(), 5);
        assert!(seeded[..5].iter().all(|f| f.is_active));
        // Same foods, possibly reordered
        let mut seeded_ids: Vec<_> = seeded.iter().map(|f| f.id.clone()).collect();
        let mut default_ids: Vec<_> = defaults.iter().map(|f| f.id.clone()).collect();
        seeded_ids.sort();
        default_ids.sort();
        assert_eq!(seeded_ids, default_ids);
    }

    #[test]
    fn test_seed_with_small_catalog_activates_everything() {
        let defaults: Vec<_> = default_foods().into_iter().take(3).collect();
        let mut rng = StdRng::seed_from_u64(1);
        let seeded = seed_catalog(&defaults, 5, &mut rng);
        assert!(seeded.iter().all(|f| f.is_active));
    }

    #[test]
    fn test_merge_keeps_active_flags_and_refreshes_content() {
        let defaults = default_foods();
        let mut stale_pizza = defaults[1].clone();
        stale_pizza.name = "Pizza vieja".to_string();
        stale_pizza.recipe = None;
        stale_pizza.is_active = true;

        let merged = merge_with_defaults(vec![stale_pizza], &defaults);

        assert_eq!(merged[0].id, "pizza");
        assert_eq!(merged[0].name, "Pizza");
        assert!(merged[0].recipe.is_some());
        assert!(merged[0].is_active);
    }

    #[test]
    fn test_merge_appends_new_defaults_inactive() {
        let defaults = default_foods();
        let mut stored: Vec<_> = defaults[..4].to_vec();
        for food in stored.iter_mut() {
            food.is_active = true;
        }

        let merged = merge_with_defaults(stored, &defaults);

        assert_eq!(merged.len(), defaults.len());
        assert!(merged[..4].iter().all(|f| f.is_active));
        assert!(merged[4..].iter().all(|f| !f.is_active));
        assert_eq!(merged[4].id, defaults[4].id);
    }

    #[test]
    fn test_merge_keeps_custom_foods_in_place() {
        let defaults = default_foods();
        let stored = vec![
            custom("custom-1", "Ravioles", false),
            defaults[0].clone(),
            custom("custom-2", "Ñoquis", true),
        ];

        let merged = merge_with_defaults(stored, &defaults);

        assert_eq!(merged[0], custom("custom-1", "Ravioles", false));
        assert_eq!(merged[1].id, defaults[0].id);
        assert_eq!(merged[2], custom("custom-2", "Ñoquis", true));
        assert_eq!(merged.len(), defaults.len() + 2);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let defaults = default_foods();
        let mut rng = StdRng::seed_from_u64(99);
        let mut stored = seed_catalog(&defaults[..6], 5, &mut rng);
        stored.push(custom("custom-1", "Ravioles", true));

        let once = merge_with_defaults(stored, &defaults);
        let twice = merge_with_defaults(once.clone(), &defaults);

        assert_eq!(once, twice);
    }
}
