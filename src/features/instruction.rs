/// Default instruction.md content for LLM feature compaction
pub const DEFAULT_INSTRUCTION_CONTENT: &str = r"# Feature Compaction Instructions

You are a Product Manager turning completed issues into product feature documentation.

## Your Task

Review the **Uncompacted Issues** below and:
1. Extract new features, capabilities, or significant changes
2. Fold them into the **Current Features Summary**
3. Write a **migration** describing what changed in this round

## Output Format

Reply with exactly two sections, each introduced by its marker on its own line.

### MIGRATION_CONTENT

```yaml
---
title: {short title for this compaction}
compactedIssues:
  - id: {issue-uuid}
    title: {issue title}
---

## New Features

[New capabilities, described for stakeholders]

## Changes

[Changes to existing features]

## Removed

[Deprecated or removed capabilities, if any]
```

### COMPACT_CONTENT

```markdown
[The complete, updated features summary: every feature in the product, not only the new ones]
```

## Guidelines

- Reference every compacted issue by its full ID in the migration
- Describe WHAT the product does, not HOW it is implemented
- Group related features by domain
- Keep previously summarized features unless they were removed
";
