//! Tabela de ideologias do 8values.
//!
//! Valores em porcentagem na ordem: igualdade, globalismo, liberdade, progresso.

pub const IDEOLOGIES: &[(&str, [f64; 4])] = &[
    ("Anarcho-Communism", [100.0, 50.0, 100.0, 90.0]),
    ("Libertarian Communism", [100.0, 70.0, 80.0, 80.0]),
    ("Trotskyism", [100.0, 100.0, 60.0, 80.0]),
    ("Marxism", [100.0, 70.0, 40.0, 80.0]),
    ("De Leonism", [100.0, 30.0, 30.0, 80.0]),
    ("Leninism", [100.0, 40.0, 20.0, 70.0]),
    ("Stalinism/Maoism", [100.0, 20.0, 0.0, 60.0]),
    ("Religious Communism", [100.0, 50.0, 30.0, 30.0]),
    ("State Socialism", [80.0, 30.0, 30.0, 70.0]),
    ("Theocratic Socialism", [80.0, 50.0, 30.0, 20.0]),
    ("Religious Socialism", [80.0, 50.0, 70.0, 20.0]),
    ("Democratic Socialism", [80.0, 50.0, 50.0, 80.0]),
    ("Revolutionary Socialism", [80.0, 20.0, 50.0, 70.0]),
    ("Libertarian Socialism", [80.0, 80.0, 80.0, 80.0]),
    ("Anarcho-Syndicalism", [80.0, 50.0, 100.0, 80.0]),
    ("Left-Wing Populism", [60.0, 40.0, 30.0, 70.0]),
    ("Theocratic Distributism", [60.0, 40.0, 30.0, 20.0]),
    ("Distributism", [60.0, 50.0, 50.0, 20.0]),
    ("Social Liberalism", [60.0, 60.0, 60.0, 80.0]),
    ("Christian Democracy", [60.0, 60.0, 50.0, 30.0]),
    ("Social Democracy", [60.0, 70.0, 40.0, 80.0]),
    ("Progressivism", [60.0, 80.0, 60.0, 100.0]),
    ("Anarcho-Mutualism", [60.0, 50.0, 100.0, 70.0]),
    ("National Totalitarianism", [50.0, 20.0, 0.0, 50.0]),
    ("Global Totalitarianism", [50.0, 80.0, 0.0, 50.0]),
    ("Technocracy", [60.0, 60.0, 20.0, 70.0]),
    ("Centrist", [50.0, 50.0, 50.0, 50.0]),
    ("Liberalism", [50.0, 60.0, 60.0, 60.0]),
    ("Religious Anarchism", [50.0, 50.0, 100.0, 20.0]),
    ("Right-Wing Populism", [40.0, 30.0, 30.0, 30.0]),
    ("Moderate Conservatism", [40.0, 40.0, 50.0, 30.0]),
    ("Reactionary", [40.0, 40.0, 40.0, 10.0]),
    ("Social Libertarianism", [60.0, 70.0, 80.0, 70.0]),
    ("Libertarianism", [40.0, 60.0, 80.0, 60.0]),
    ("Anarcho-Egoism", [40.0, 50.0, 100.0, 50.0]),
    ("Nazism", [40.0, 0.0, 0.0, 5.0]),
    ("Autocracy", [40.0, 20.0, 10.0, 40.0]),
    ("Fascism", [40.0, 20.0, 20.0, 20.0]),
    ("Capitalist Fascism", [20.0, 20.0, 20.0, 20.0]),
    ("Conservatism", [30.0, 40.0, 40.0, 20.0]),
    ("Neo-Liberalism", [30.0, 30.0, 50.0, 50.0]),
    ("Classical Liberalism", [30.0, 60.0, 60.0, 80.0]),
    ("Authoritarian Capitalism", [20.0, 30.0, 20.0, 40.0]),
    ("State Capitalism", [20.0, 50.0, 30.0, 50.0]),
    ("Neo-Conservatism", [20.0, 20.0, 40.0, 20.0]),
    ("Fundamentalism", [20.0, 30.0, 30.0, 5.0]),
    ("Libertarian Capitalism", [20.0, 50.0, 80.0, 60.0]),
    ("Market Anarchism", [20.0, 50.0, 100.0, 50.0]),
    ("Objectivism", [10.0, 50.0, 90.0, 40.0]),
    ("Totalitarian Capitalism", [0.0, 30.0, 0.0, 50.0]),
    ("Ultra-Capitalism", [0.0, 40.0, 50.0, 50.0]),
    ("Anarcho-Capitalism", [0.0, 50.0, 100.0, 50.0]),
];

/// Ideologia mais próxima (distância euclidiana) dos valores dados.
pub fn closest(values: &[f64; 4]) -> &'static str {
    let distance = |target: &[f64; 4]| -> f64 {
        target
            .iter()
            .zip(values.iter())
            .map(|(t, v)| (t - v).powi(2))
            .sum::<f64>()
    };

    IDEOLOGIES
        .iter()
        .min_by(|(_, a), (_, b)| distance(a).total_cmp(&distance(b)))
        .map(|(name, _)| *name)
        .unwrap_or("Centrist")
}
