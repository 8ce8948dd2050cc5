//! v001: memories, memories_fts + sync triggers, contradictions.

use rusqlite::Connection;

use engram_core::constants::FTS_TOKENIZER;
use engram_core::errors::EngramResult;

use crate::store_err;

pub fn migrate(conn: &Connection) -> EngramResult<()> {
    conn.execute_batch(&format!(
        "
        CREATE TABLE IF NOT EXISTS memories (
            id            TEXT PRIMARY KEY,
            content       TEXT NOT NULL,
            entity        TEXT,
            category      TEXT NOT NULL DEFAULT 'fact',
            confidence    REAL NOT NULL DEFAULT 0.8
                          CHECK (confidence >= 0.0 AND confidence <= 1.0),
            embedding     BLOB,
            source        TEXT NOT NULL DEFAULT 'manual',
            namespace     TEXT NOT NULL DEFAULT 'default',
            tags          TEXT NOT NULL DEFAULT '[]',
            access_count  INTEGER NOT NULL DEFAULT 0 CHECK (access_count >= 0),
            decay_rate    REAL NOT NULL DEFAULT 0.01
                          CHECK (decay_rate >= 0.0 AND decay_rate <= 0.1),
            created_at    INTEGER NOT NULL,
            updated_at    INTEGER NOT NULL,
            last_accessed INTEGER,
            CHECK (created_at <= updated_at),
            CHECK (last_accessed IS NULL OR last_accessed >= created_at)
        );

        CREATE INDEX IF NOT EXISTS idx_memories_ns_created
            ON memories(namespace, created_at DESC);
        CREATE INDEX IF NOT EXISTS idx_memories_ns_category
            ON memories(namespace, category);
        CREATE INDEX IF NOT EXISTS idx_memories_entity
            ON memories(entity) WHERE entity IS NOT NULL;
        CREATE INDEX IF NOT EXISTS idx_memories_embedded
            ON memories(namespace, id) WHERE embedding IS NOT NULL;

        CREATE VIRTUAL TABLE IF NOT EXISTS memories_fts USING fts5(
            content, entity, category, namespace,
            content='memories', content_rowid='rowid',
            tokenize='{FTS_TOKENIZER}'
        );

        CREATE TRIGGER IF NOT EXISTS memories_fts_ai AFTER INSERT ON memories BEGIN
            INSERT INTO memories_fts(rowid, content, entity, category, namespace)
            VALUES (new.rowid, new.content, new.entity, new.category, new.namespace);
        END;

        CREATE TRIGGER IF NOT EXISTS memories_fts_ad AFTER DELETE ON memories BEGIN
            INSERT INTO memories_fts(memories_fts, rowid, content, entity, category, namespace)
            VALUES ('delete', old.rowid, old.content, old.entity, old.category, old.namespace);
        END;

        CREATE TRIGGER IF NOT EXISTS memories_fts_au AFTER UPDATE ON memories BEGIN
            INSERT INTO memories_fts(memories_fts, rowid, content, entity, category, namespace)
            VALUES ('delete', old.rowid, old.content, old.entity, old.category, old.namespace);
            INSERT INTO memories_fts(rowid, content, entity, category, namespace)
            VALUES (new.rowid, new.content, new.entity, new.category, new.namespace);
        END;

        CREATE TABLE IF NOT EXISTS contradictions (
            id                TEXT PRIMARY KEY,
            memory1_id        TEXT NOT NULL,
            memory2_id        TEXT NOT NULL,
            entity            TEXT NOT NULL,
            confidence        REAL NOT NULL,
            reason            TEXT NOT NULL,
            status            TEXT NOT NULL DEFAULT 'unresolved',
            resolution_action TEXT,
            detected_at       INTEGER NOT NULL,
            resolved_at       INTEGER
        );

        CREATE INDEX IF NOT EXISTS idx_contradictions_status
            ON contradictions(status, detected_at DESC);
        CREATE INDEX IF NOT EXISTS idx_contradictions_m1
            ON contradictions(memory1_id);
        CREATE INDEX IF NOT EXISTS idx_contradictions_m2
            ON contradictions(memory2_id);
        ",
    ))
    .map_err(|e| store_err(e.to_string()))?;

    // Pin the tokenizer so a future change forces a rebuild, not a silent
    // behavior drift.
    super::write_meta(conn, "fts_tokenizer", FTS_TOKENIZER)?;
    Ok(())
}
