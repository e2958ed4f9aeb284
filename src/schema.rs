//! Catalog and NIRD schema, plus the reference rows seeded into it.

/// Tables declared by [`SCHEMA_SQL`], in declaration order.
pub const DECLARED_TABLES: [&str; 12] = [
    "Utilisateur",
    "Logiciel",
    "Categorie",
    "Tag",
    "Avis",
    "Favori",
    "Historique",
    "LogicielTag",
    "LogicielCategorie",
    "demarche_nird",
    "pourquoi_nird",
    "Pilote",
];

/// Table SQLite maintains on its own for `AUTOINCREMENT` columns.
pub const SEQUENCE_TABLE: &str = "sqlite_sequence";

/// Table holding the pilot sites; the initializer reports statistics on it.
pub const PILOT_TABLE: &str = "Pilote";

pub const SEEDED_PILOTS: usize = 18;

/// Only ever adds what is missing. Every seeded table carries a unique key so
/// [`SEED_SQL`] can be replayed.
pub const SCHEMA_SQL: &str = r#"
-- catalog
CREATE TABLE IF NOT EXISTS Utilisateur (
    user_id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    role TEXT DEFAULT 'user',
    avatar_url TEXT,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS Logiciel (
    software_id INTEGER PRIMARY KEY AUTOINCREMENT,
    nom TEXT NOT NULL,
    version TEXT,
    description TEXT,
    website_url TEXT,
    license_type TEXT,
    platform TEXT,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    updated_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    submitted_by INTEGER,
    FOREIGN KEY (submitted_by) REFERENCES Utilisateur(user_id),
    UNIQUE(nom, version)
);

CREATE TABLE IF NOT EXISTS Categorie (
    category_id INTEGER PRIMARY KEY AUTOINCREMENT,
    nom TEXT NOT NULL UNIQUE,
    description TEXT
);

CREATE TABLE IF NOT EXISTS Tag (
    tag_id INTEGER PRIMARY KEY AUTOINCREMENT,
    nom TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS Avis (
    review_id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    software_id INTEGER NOT NULL,
    note INTEGER CHECK(note >= 1 AND note <= 5),
    titre TEXT,
    commentaire TEXT,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    updated_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (user_id) REFERENCES Utilisateur(user_id),
    FOREIGN KEY (software_id) REFERENCES Logiciel(software_id)
);

CREATE TABLE IF NOT EXISTS Favori (
    favorite_id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    software_id INTEGER NOT NULL,
    added_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (user_id) REFERENCES Utilisateur(user_id),
    FOREIGN KEY (software_id) REFERENCES Logiciel(software_id),
    UNIQUE(user_id, software_id)
);

CREATE TABLE IF NOT EXISTS Historique (
    history_id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    software_id INTEGER NOT NULL,
    viewed_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (user_id) REFERENCES Utilisateur(user_id),
    FOREIGN KEY (software_id) REFERENCES Logiciel(software_id)
);

CREATE TABLE IF NOT EXISTS LogicielTag (
    software_id INTEGER NOT NULL,
    tag_id INTEGER NOT NULL,
    PRIMARY KEY (software_id, tag_id),
    FOREIGN KEY (software_id) REFERENCES Logiciel(software_id),
    FOREIGN KEY (tag_id) REFERENCES Tag(tag_id)
);

CREATE TABLE IF NOT EXISTS LogicielCategorie (
    software_id INTEGER NOT NULL,
    category_id INTEGER NOT NULL,
    PRIMARY KEY (software_id, category_id),
    FOREIGN KEY (software_id) REFERENCES Logiciel(software_id),
    FOREIGN KEY (category_id) REFERENCES Categorie(category_id)
);

-- NIRD
CREATE TABLE IF NOT EXISTS demarche_nird (
    rowid INTEGER PRIMARY KEY AUTOINCREMENT,
    nom TEXT NOT NULL,
    type TEXT CHECK(type IN ('etablissement', 'collectivite')),
    machines_reconditionnees INTEGER DEFAULT 0,
    region TEXT,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    UNIQUE(nom)
);

CREATE TABLE IF NOT EXISTS pourquoi_nird (
    rowid INTEGER PRIMARY KEY AUTOINCREMENT,
    titre TEXT NOT NULL,
    source TEXT,
    type TEXT CHECK(type IN ('officiel', 'collectivite', 'autre')),
    impact REAL DEFAULT 0,
    annee INTEGER,
    url TEXT,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    UNIQUE(titre)
);

CREATE TABLE IF NOT EXISTS Pilote (
    rowid INTEGER PRIMARY KEY AUTOINCREMENT,
    nom TEXT NOT NULL,
    code TEXT UNIQUE,
    ville TEXT,
    academie TEXT,
    type TEXT CHECK(type IN ('ecole', 'college', 'lycee')),
    contact TEXT,
    email TEXT,
    status TEXT DEFAULT 'actif',
    latitude REAL,
    longitude REAL,
    url TEXT,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
    updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
);

-- pilot lookups
CREATE INDEX IF NOT EXISTS idx_pilotes_nom ON Pilote(nom);
CREATE INDEX IF NOT EXISTS idx_pilotes_type ON Pilote(type);
CREATE INDEX IF NOT EXISTS idx_pilotes_academie ON Pilote(academie);
CREATE INDEX IF NOT EXISTS idx_pilotes_code ON Pilote(code);
"#;

/// `INSERT OR IGNORE` everywhere, keyed on the declared unique constraints.
pub const SEED_SQL: &str = r#"
INSERT OR IGNORE INTO Utilisateur (username, email, password_hash, role) VALUES
('admin', 'admin@nird.fr', '$2b$10$hashed', 'admin'),
('user1', 'user1@example.com', '$2b$10$hashed', 'user');

INSERT OR IGNORE INTO Categorie (nom, description) VALUES
('Développement', 'Outils de développement logiciel'),
('Base de données', 'Systèmes de gestion de bases de données'),
('Éditeurs', 'Éditeurs de code et texte'),
('Bureautique', 'Outils de productivité');

INSERT OR IGNORE INTO Tag (nom) VALUES
('JavaScript'), ('Python'), ('Open Source'), ('Web'), ('Mobile'), ('Education'), ('Linux');

INSERT OR IGNORE INTO Logiciel (nom, version, description, website_url, license_type, platform, submitted_by) VALUES
('Node.js', '20.10.0', 'Runtime JavaScript côté serveur', 'https://nodejs.org', 'Open Source', 'Web/Server', 1),
('VS Code', '1.84', 'Éditeur de code open source', 'https://code.visualstudio.com', 'Open Source', 'Desktop', 1),
('SQLite', '3.44', 'Base de données légère', 'https://sqlite.org', 'Public Domain', 'Mobile/Desktop', 1),
('LibreOffice', '7.6', 'Suite bureautique libre', 'https://libreoffice.org', 'Open Source', 'Desktop', 1);

INSERT OR IGNORE INTO demarche_nird (nom, type, machines_reconditionnees, region) VALUES
('Collège Victor Hugo', 'etablissement', 25, 'Occitanie'),
('Lycée Marie Curie', 'etablissement', 42, 'Auvergne-Rhône-Alpes'),
('Ville de Montpellier', 'collectivite', 150, 'Occitanie'),
('Département du Rhône', 'collectivite', 320, 'Auvergne-Rhône-Alpes');

INSERT OR IGNORE INTO pourquoi_nird (titre, source, type, impact, annee, url) VALUES
('Référentiel Eduscol 2019', 'Eduscol', 'officiel', 8.5, 2019, 'https://eduscol.education.fr'),
('Circulaire MEN 2023', 'Ministère Education Nationale', 'officiel', 9.2, 2023, NULL),
('Rapport ADEME 2025', 'ADEME', 'officiel', 9.8, 2025, 'https://ademe.fr');

INSERT OR IGNORE INTO Pilote (nom, code, url, type, ville, academie, latitude, longitude, status) VALUES
('Cité scolaire Bellevue', '0810005r', 'https://nird.forge.apps.education.fr/pilotes/0810005r.html', 'lycee', 'Albi', 'Toulouse', 43.9298, 2.1480, 'actif'),
('Collège Coat Mez', '0290033d', 'https://nird.forge.apps.education.fr/pilotes/0290033d.html', 'college', 'Daoulas', 'Rennes', 48.3603, -4.2608, 'actif'),
('Collège des 7 vallées', '0620099w', 'https://nird.forge.apps.education.fr/pilotes/0620099w.html', 'college', 'Hesdin', 'Lille', 50.3742, 2.0386, 'actif'),
('Collège Les Cuvelles', '0550023b', 'https://nird.forge.apps.education.fr/pilotes/0550023b.html', 'college', 'Vaucouleurs', 'Nancy-Metz', 48.6023, 5.6641, 'actif'),
('Collège Uporu', '9840234g', 'https://nird.forge.apps.education.fr/pilotes/9840234g.html', 'college', 'Bourail', 'Nouvelle-Calédonie', -21.5702, 165.4829, 'actif'),
('Collège Victor Vasarely', '0220008p', 'https://nird.forge.apps.education.fr/pilotes/0220008p.html', 'college', 'Ploufragan', 'Rennes', 48.4912, -2.7927, 'actif'),
('École élémentaire Louis Barrié', '0460509d', 'https://nird.forge.apps.education.fr/pilotes/0460509d.html', 'ecole', 'Cahors', 'Toulouse', 44.4479, 1.4406, 'actif'),
('Lycée Alain Borne', '0260015a', 'https://nird.forge.apps.education.fr/pilotes/0260015a.html', 'lycee', 'Montélimar', 'Grenoble', 44.5586, 4.7517, 'actif'),
('Lycée Carnot', '0620056z', 'https://nird.forge.apps.education.fr/pilotes/0620056z.html', 'lycee', 'Bruay-la-Buissière', 'Lille', 50.4838, 2.5532, 'actif'),
('Lycée de la Plaine de l''Ain', '0011194t', 'https://nird.forge.apps.education.fr/pilotes/0011194t.html', 'lycee', 'Ambérieu-en-Bugey', 'Lyon', 45.9606, 5.3597, 'actif'),
('Lycée des métiers Heinrich-Nessel', '0671509b', 'https://nird.forge.apps.education.fr/pilotes/0671509b.html', 'lycee', 'Haguenau', 'Strasbourg', 48.8156, 7.7895, 'actif'),
('Lycée Jacques Prevert', '0911577v', 'https://nird.forge.apps.education.fr/pilotes/0911577v.html', 'lycee', 'Longjumeau', 'Versailles', 48.6952, 2.2959, 'actif'),
('Lycée Jean Monnet', '0741476c', 'https://nird.forge.apps.education.fr/pilotes/0741476c.html', 'lycee', 'Annemasse', 'Grenoble', 46.1949, 6.2372, 'actif'),
('Lycée La Martinière Diderot', '0690037r', 'https://nird.forge.apps.education.fr/pilotes/0690037r.html', 'lycee', 'Lyon', 'Lyon', 45.7640, 4.8357, 'actif'),
('Lycée Marie Curie', '0382920t', 'https://nird.forge.apps.education.fr/pilotes/0382920t.html', 'lycee', 'Échirolles', 'Grenoble', 45.1437, 5.7156, 'actif'),
('Lycée professionnel Jean Lurçat', '0451067r', 'https://nird.forge.apps.education.fr/pilotes/0451067r.html', 'lycee', 'Fleury-les-Aubrais', 'Orléans-Tours', 47.9340, 1.9167, 'actif'),
('Lycée Simone de Beauvoir', '0313083h', 'https://nird.forge.apps.education.fr/pilotes/0313083h.html', 'lycee', 'Garges-lès-Gonesse', 'Créteil', 48.9733, 2.4018, 'actif'),
('Lycée Vincent d''Indy', '0070021k', 'https://nird.forge.apps.education.fr/pilotes/0070021k.html', 'lycee', 'Privas', 'Grenoble', 44.7354, 4.5996, 'actif');
"#;
