//! Static catalog data
//!
//! Exercises, routines and FAQ entries are created once at process start and
//! never mutated. The seed profile, the seed favorites and the sample log
//! entry are starting values for the in-memory repository.

use chrono::{DateTime, Duration, Utc};

use crate::types::{
    Exercise, Faq, PerformedExercise, PerformedSet, ProfileData, RoutineId, WorkoutLogEntry,
    WorkoutRoutine,
};

/// Everything the in-memory repository is seeded with
#[derive(Debug, Clone)]
pub struct Catalog {
    pub exercises: Vec<Exercise>,
    pub routines: Vec<WorkoutRoutine>,
    pub faqs: Vec<Faq>,
    pub profile: ProfileData,
    pub logs: Vec<WorkoutLogEntry>,
}

impl Catalog {
    /// The catalog the app ships with, including one sample log from yesterday
    pub fn builtin() -> Self {
        let profile = default_profile();
        let exercises = exercises(&profile);
        let routines = routines(&exercises);
        let logs = vec![sample_log(Utc::now())];

        Self {
            exercises,
            routines,
            faqs: faqs(),
            profile,
            logs,
        }
    }

    /// Same catalog without the sample log entry
    pub fn without_logs() -> Self {
        Self {
            logs: Vec::new(),
            ..Self::builtin()
        }
    }

    /// Routine ids flagged as favorite in the seed data
    pub fn seed_favorites(&self) -> Vec<RoutineId> {
        self.routines
            .iter()
            .filter(|r| r.is_favorite)
            .map(|r| r.id)
            .collect()
    }
}

pub fn default_profile() -> ProfileData {
    ProfileData {
        id: 1,
        name: "Julia Oliveira".to_string(),
        height: 170.0,
        weight: 75.0,
    }
}

fn exercise(id: u32, name: &str, description: &str, sets: u32, reps: u32, weight: f64) -> Exercise {
    Exercise {
        id,
        name: name.to_string(),
        description: description.to_string(),
        sets,
        reps,
        weight,
    }
}

fn exercises(profile: &ProfileData) -> Vec<Exercise> {
    vec![
        exercise(1, "Supino Reto", "Exercício de supino reto com barra.", 3, 12, 100.0),
        exercise(2, "Rosca Direta", "Exercício de rosca direta com barra.", 3, 12, 20.0),
        exercise(3, "Agachamento", "Exercício de agachamento com barra.", 3, 12, 50.0),
        // Bodyweight: the target load is the user's own weight
        exercise(4, "Barra fixa", "Exercício de costas com barra fixa.", 3, 12, profile.weight),
        exercise(5, "Levantamento terra", "Exercício de levantamento terra com barra.", 3, 12, 100.0),
        exercise(6, "Tríceps Corda", "Exercício de tríceps com corda na polia.", 3, 15, 25.0),
        exercise(7, "Rosca Martelo", "Exercício de bíceps com halteres.", 3, 12, 15.0),
        exercise(8, "Leg Press", "Exercício de pernas no aparelho leg press.", 4, 10, 200.0),
        exercise(9, "Remada Curvada", "Exercício de costas com barra.", 3, 12, 60.0),
        exercise(10, "Puxada Frontal", "Exercício de costas na polia alta.", 3, 12, 70.0),
        exercise(11, "Burpees", "Exercício funcional de corpo inteiro.", 5, 20, 0.0),
        exercise(12, "Mountain Climbers", "Exercício cardiovascular.", 5, 30, 0.0),
    ]
}

fn pick(exercises: &[Exercise], ids: &[u32]) -> Vec<Exercise> {
    ids.iter()
        .filter_map(|id| exercises.iter().find(|e| e.id == *id).cloned())
        .collect()
}

fn routines(exercises: &[Exercise]) -> Vec<WorkoutRoutine> {
    vec![
        WorkoutRoutine {
            id: 1,
            name: "Treino Full Body".to_string(),
            description: "Um treino completo que trabalha todos os principais grupos musculares em uma única sessão. Ideal para quem tem pouco tempo disponível e quer maximizar resultados.".to_string(),
            duration: 60,
            difficulty: "Intermediário".to_string(),
            category: "Força".to_string(),
            exercises: pick(exercises, &[1, 3, 4, 5]),
            video_url: Some("https://example.com/videos/fullbody.mp4".to_string()),
            audio_url: None,
            is_favorite: false,
            rating: 0.0,
            calories_burned: 450,
        },
        WorkoutRoutine {
            id: 2,
            name: "Treino de Braços".to_string(),
            description: "Foco intenso em bíceps, tríceps e antebraços para desenvolver força e definição nos membros superiores.".to_string(),
            duration: 45,
            difficulty: "Iniciante".to_string(),
            category: "Força".to_string(),
            exercises: pick(exercises, &[2, 6, 7]),
            video_url: None,
            audio_url: Some("https://example.com/audio/arms_guidance.mp3".to_string()),
            is_favorite: false,
            rating: 0.0,
            calories_burned: 300,
        },
        WorkoutRoutine {
            id: 3,
            name: "Treino de Pernas".to_string(),
            description: "Treino focado em quadríceps, posteriores, glúteos e panturrilhas para desenvolver força e potência nos membros inferiores.".to_string(),
            duration: 50,
            difficulty: "Avançado".to_string(),
            category: "Força".to_string(),
            exercises: pick(exercises, &[3, 5, 8]),
            video_url: Some("https://example.com/videos/legs.mp4".to_string()),
            audio_url: None,
            is_favorite: true,
            rating: 0.0,
            calories_burned: 500,
        },
        WorkoutRoutine {
            id: 4,
            name: "Treino de Costas".to_string(),
            description: "Foco em desenvolver os músculos das costas, incluindo latíssimo do dorso, trapézio e romboides.".to_string(),
            duration: 40,
            difficulty: "Intermediário".to_string(),
            category: "Força".to_string(),
            exercises: pick(exercises, &[4, 9, 10]),
            video_url: None,
            audio_url: None,
            is_favorite: false,
            rating: 0.0,
            calories_burned: 380,
        },
        WorkoutRoutine {
            id: 5,
            name: "Treino HIIT".to_string(),
            description: "Treino intervalado de alta intensidade para queima de gordura e condicionamento cardiovascular.".to_string(),
            duration: 30,
            difficulty: "Avançado".to_string(),
            category: "Cardio".to_string(),
            exercises: pick(exercises, &[11, 12]),
            video_url: Some("https://example.com/videos/hiit.mp4".to_string()),
            audio_url: None,
            is_favorite: true,
            rating: 0.0,
            calories_burned: 400,
        },
    ]
}

pub fn faqs() -> Vec<Faq> {
    let entry = |id: u32, question: &str, answer: &str| Faq {
        id,
        question: question.to_string(),
        answer: answer.to_string(),
    };

    vec![
        entry(1, "Como registrar um novo treino?", "Na tela 'Log', clique no botão '+' e selecione uma rotina ou crie um treino personalizado."),
        entry(2, "Como marcar uma rotina como favorita?", "Na tela de detalhes da rotina (acessível pela tela inicial), clique no ícone de estrela."),
        entry(3, "Como usar o timer de descanso?", "Durante o registro de um treino, após completar uma série, clique no ícone de cronômetro para iniciar o descanso."),
        entry(4, "Como editar ou excluir um treino do histórico?", "Na tela 'Log', encontre o registro desejado e use os ícones de lápis (editar) ou lixeira (excluir)."),
        entry(5, "Como criar uma rotina personalizada?", "Atualmente, você pode registrar um treino personalizado na hora. A funcionalidade de salvar rotinas personalizadas será adicionada em breve."),
    ]
}

/// A finished one-hour full-body session that ended `now - 23h`
pub fn sample_log(now: DateTime<Utc>) -> WorkoutLogEntry {
    let start = now - Duration::days(1);
    let end = start + Duration::hours(1);

    let completed = |reps: u32| PerformedSet {
        is_completed: true,
        ..PerformedSet::new(reps, 100.0)
    };

    let mut bench = PerformedExercise {
        id: uuid::Uuid::new_v4().to_string(),
        exercise_id: 1,
        exercise_name: "Supino Reto".to_string(),
        sets: Vec::new(),
        target_sets: 3,
        target_reps: 12,
        target_weight: 100.0,
    };
    bench.sets = vec![completed(12), completed(10), completed(8)];

    WorkoutLogEntry {
        id: uuid::Uuid::new_v4().to_string(),
        routine_id: Some(1),
        workout_name: "Treino Full Body".to_string(),
        start_time: start,
        end_time: Some(end),
        duration_millis: (end - start).num_milliseconds(),
        performed_exercises: vec![bench],
        notes: Some("Bom treino, consegui completar todas as séries.".to_string()),
        calories_burned: Some(450),
    }
}
