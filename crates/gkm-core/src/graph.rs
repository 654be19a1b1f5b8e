//! 依存関係グラフ
//!
//! アプリ間の依存関係を検証し、トポロジカル順序（ビルド順序）を計算する。

use crate::error::{ConfigError, Result};
use crate::model::app::AppConfig;
use crate::model::workspace::Workspace;
use std::collections::HashSet;

/// 依存関係の静的検証
///
/// 以下をチェックする:
/// - 依存先のアプリ名がワークスペースに定義されているか
/// - 自己依存していないか
///
/// I/Oの前、ワークスペース構築時に1回だけ実行される。
pub fn validate_dependencies(apps: &[(String, AppConfig)]) -> Result<()> {
    let names: HashSet<&str> = apps.iter().map(|(name, _)| name.as_str()).collect();

    for (name, app) in apps {
        for dep in &app.dependencies {
            if dep == name {
                return Err(ConfigError::SelfDependency(name.clone()));
            }
            if !names.contains(dep.as_str()) {
                return Err(ConfigError::UnknownDependency {
                    app: name.clone(),
                    dependency: dep.clone(),
                });
            }
        }
    }

    Ok(())
}

/// ビルド順序（トポロジカル順序）を計算する
///
/// 各アプリは、その推移的依存がすべて先に現れる位置に置かれる。
/// DFSの帰りがけ順: 依存を先に再帰訪問してから自分を追加する。
///
/// 循環依存は即時エラー。訪問中スタックに既出のノードへ到達した場合、
/// 循環パスを含む `ConfigError::CircularDependency` を返す。
pub fn build_order(workspace: &Workspace) -> Result<Vec<String>> {
    let mut order = Vec::with_capacity(workspace.app_count());
    let mut visited = HashSet::new();
    let mut stack = Vec::new();

    for name in workspace.app_names() {
        visit(workspace, name, &mut visited, &mut stack, &mut order)?;
    }

    tracing::debug!(order = ?order, "Resolved app build order");
    Ok(order)
}

fn visit(
    workspace: &Workspace,
    name: &str,
    visited: &mut HashSet<String>,
    stack: &mut Vec<String>,
    order: &mut Vec<String>,
) -> Result<()> {
    if visited.contains(name) {
        return Ok(());
    }

    if let Some(pos) = stack.iter().position(|n| n == name) {
        let mut cycle: Vec<&str> = stack[pos..].iter().map(String::as_str).collect();
        cycle.push(name);
        return Err(ConfigError::CircularDependency(cycle.join(" -> ")));
    }

    stack.push(name.to_string());
    if let Some(app) = workspace.app(name) {
        for dep in &app.dependencies {
            visit(workspace, dep, visited, stack, order)?;
        }
    }
    stack.pop();

    visited.insert(name.to_string());
    order.push(name.to_string());
    Ok(())
}
